use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== NODES ==========
        // The only mutable table: one row per physical sensor unit, upserted on node_id.
        manager
            .create_table(
                Table::create()
                    .table(Nodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Nodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Nodes::NodeId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Nodes::LastSeen)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Nodes::Status)
                            .string()
                            .not_null()
                            .default("ONLINE"),
                    )
                    .col(
                        ColumnDef::new(Nodes::DriftStatus)
                            .string()
                            .not_null()
                            .default("SYNCED"),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== SENSOR DATA ==========
        manager
            .create_table(
                Table::create()
                    .table(SensorData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SensorData::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SensorData::NodeId).string().not_null())
                    .col(
                        ColumnDef::new(SensorData::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SensorData::Temp1).double())
                    .col(ColumnDef::new(SensorData::Hum1).double())
                    .col(ColumnDef::new(SensorData::Temp2).double())
                    .col(ColumnDef::new(SensorData::Hum2).double())
                    .col(ColumnDef::new(SensorData::MoldIndex).double())
                    .col(ColumnDef::new(SensorData::DriftVal).double())
                    .col(ColumnDef::new(SensorData::SystemHealth).string())
                    .col(ColumnDef::new(SensorData::RiskLevel).integer())
                    .to_owned(),
            )
            .await?;

        // History and overview both read "latest rows for one node"
        manager
            .create_index(
                Index::create()
                    .name("idx_sensor_data_node_timestamp")
                    .table(SensorData::Table)
                    .col(SensorData::NodeId)
                    .col(SensorData::Timestamp)
                    .to_owned(),
            )
            .await?;

        // ========== ALERTS ==========
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alerts::NodeId).string().not_null())
                    .col(
                        ColumnDef::new(Alerts::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alerts::AlertLevel).string().not_null())
                    .col(ColumnDef::new(Alerts::Message).text().not_null())
                    .col(ColumnDef::new(Alerts::Metrics).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alerts_timestamp")
                    .table(Alerts::Table)
                    .col(Alerts::Timestamp)
                    .to_owned(),
            )
            .await?;

        // ========== HEALTH REPORTS ==========
        manager
            .create_table(
                Table::create()
                    .table(HealthReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HealthReports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HealthReports::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HealthReports::Network).json().not_null())
                    .col(ColumnDef::new(HealthReports::Nodes).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_health_reports_timestamp")
                    .table(HealthReports::Table)
                    .col(HealthReports::Timestamp)
                    .to_owned(),
            )
            .await?;

        // ========== ERROR LOGS ==========
        manager
            .create_table(
                Table::create()
                    .table(ErrorLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ErrorLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ErrorLogs::NodeId).string().not_null())
                    .col(
                        ColumnDef::new(ErrorLogs::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ErrorLogs::ErrorCode).string().not_null())
                    .col(ColumnDef::new(ErrorLogs::Details).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_error_logs_timestamp")
                    .table(ErrorLogs::Table)
                    .col(ErrorLogs::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ErrorLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HealthReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SensorData::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Nodes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Nodes {
    Table,
    Id,
    NodeId,
    LastSeen,
    Status,
    DriftStatus,
}

#[derive(DeriveIden)]
pub enum SensorData {
    Table,
    Id,
    NodeId,
    Timestamp,
    #[sea_orm(iden = "temp_1")]
    Temp1,
    #[sea_orm(iden = "hum_1")]
    Hum1,
    #[sea_orm(iden = "temp_2")]
    Temp2,
    #[sea_orm(iden = "hum_2")]
    Hum2,
    MoldIndex,
    DriftVal,
    SystemHealth,
    RiskLevel,
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    Id,
    NodeId,
    Timestamp,
    AlertLevel,
    Message,
    Metrics,
}

#[derive(DeriveIden)]
enum HealthReports {
    Table,
    Id,
    Timestamp,
    Network,
    Nodes,
}

#[derive(DeriveIden)]
enum ErrorLogs {
    Table,
    Id,
    NodeId,
    Timestamp,
    ErrorCode,
    Details,
}
