use crate::client::{decode, encode, validate_connector_name, DebeziumClient};
use crate::context::CallContext;
use crate::endpoint::{Operation, Target};
use crate::error::Result;
use crate::models::{
    ConnectorConfig, ConnectorInfo, ConnectorList, ConnectorStatus, CreateConnectorRequest,
    CreatedConnector, TaskInfo,
};
use std::collections::HashMap;

impl DebeziumClient {
    // ========== Lifecycle ==========

    /// `POST /connectors`. Succeeds only on 201.
    pub async fn create_connector(
        &self,
        ctx: &CallContext,
        request: &CreateConnectorRequest,
    ) -> Result<CreatedConnector> {
        let operation = Operation::CreateConnector;
        validate_connector_name(operation, &request.name)?;

        let body = encode(operation, request)?;
        let response = self
            .execute(ctx, operation, Target::Collection, None, Some(body))
            .await?;
        decode(operation, &response)
    }

    pub async fn get_connector(&self, ctx: &CallContext, name: &str) -> Result<ConnectorInfo> {
        let operation = Operation::GetConnector;
        validate_connector_name(operation, name)?;

        let response = self
            .execute(ctx, operation, Target::Connector(name), None, None)
            .await?;
        decode(operation, &response)
    }

    /// Deleting a connector that does not exist is an API error.
    pub async fn delete_connector(&self, ctx: &CallContext, name: &str) -> Result<()> {
        let operation = Operation::DeleteConnector;
        validate_connector_name(operation, name)?;

        self.execute(ctx, operation, Target::Connector(name), None, None)
            .await?;
        Ok(())
    }

    // ========== Runtime control ==========

    pub async fn get_connector_status(
        &self,
        ctx: &CallContext,
        name: &str,
    ) -> Result<ConnectorStatus> {
        let operation = Operation::GetConnectorStatus;
        validate_connector_name(operation, name)?;

        let response = self
            .execute(ctx, operation, Target::Connector(name), None, None)
            .await?;
        decode(operation, &response)
    }

    pub async fn pause_connector(&self, ctx: &CallContext, name: &str) -> Result<()> {
        self.control(ctx, Operation::PauseConnector, name).await
    }

    pub async fn resume_connector(&self, ctx: &CallContext, name: &str) -> Result<()> {
        self.control(ctx, Operation::ResumeConnector, name).await
    }

    pub async fn restart_connector(&self, ctx: &CallContext, name: &str) -> Result<()> {
        self.control(ctx, Operation::RestartConnector, name).await
    }

    async fn control(&self, ctx: &CallContext, operation: Operation, name: &str) -> Result<()> {
        validate_connector_name(operation, name)?;

        self.execute(ctx, operation, Target::Connector(name), None, None)
            .await?;
        Ok(())
    }

    // ========== Config ==========

    /// `PUT /connectors/{name}/config` with the full replacement config.
    /// A 201 (connector created by this call) and a 200 both succeed.
    pub async fn update_connector_config(
        &self,
        ctx: &CallContext,
        name: &str,
        config: &ConnectorConfig,
    ) -> Result<ConnectorInfo> {
        let operation = Operation::UpdateConnectorConfig;
        validate_connector_name(operation, name)?;

        let body = encode(operation, config)?;
        let response = self
            .execute(ctx, operation, Target::Connector(name), None, Some(body))
            .await?;
        decode(operation, &response)
    }

    // ========== Tasks ==========

    pub async fn get_connector_tasks(&self, ctx: &CallContext, name: &str) -> Result<Vec<TaskInfo>> {
        let operation = Operation::GetConnectorTasks;
        validate_connector_name(operation, name)?;

        let response = self
            .execute(ctx, operation, Target::Connector(name), None, None)
            .await?;
        decode(operation, &response)
    }

    /// The task index is passed through as given; the server decides whether
    /// it exists.
    pub async fn restart_connector_task(
        &self,
        ctx: &CallContext,
        name: &str,
        task: i32,
    ) -> Result<()> {
        let operation = Operation::RestartConnectorTask;
        validate_connector_name(operation, name)?;

        let target = Target::Task {
            connector: name,
            task,
        };
        self.execute(ctx, operation, target, None, None).await?;
        Ok(())
    }

    // ========== Discovery ==========

    /// `GET /connectors`, with `?expand=status` when `expand_status` is set.
    pub async fn list_connectors(
        &self,
        ctx: &CallContext,
        expand_status: bool,
    ) -> Result<ConnectorList> {
        let operation = Operation::ListConnectors;
        let query = expand_status.then_some(("expand", "status"));

        let response = self
            .execute(ctx, operation, Target::Collection, query, None)
            .await?;

        if expand_status {
            let statuses: HashMap<String, ConnectorStatus> = decode(operation, &response)?;
            Ok(ConnectorList::from_statuses(statuses))
        } else {
            let names: Vec<String> = decode(operation, &response)?;
            Ok(ConnectorList::from_names(names))
        }
    }
}
