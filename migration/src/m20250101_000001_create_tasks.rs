use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // AUTOINCREMENT keeps ids of deleted rows from being handed out again,
        // restore re-inserts removed tasks under their original id.
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tasks::Name).string().not_null().default(""))
                    .col(ColumnDef::new(Tasks::TaskType).string().not_null().default(""))
                    .col(ColumnDef::new(Tasks::Detail).text().not_null().default(""))
                    .col(ColumnDef::new(Tasks::Schedule).json().not_null())
                    .col(ColumnDef::new(Tasks::OrderId).integer().not_null().default(0))
                    .col(ColumnDef::new(Tasks::Status).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_order_id")
                    .table(Tasks::Table)
                    .col(Tasks::OrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Name,
    TaskType,
    Detail,
    Schedule,
    OrderId,
    Status,
}
