// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::extra::Extra;
use crate::domain::repositories::extra_repository::ExtraRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::extra as extra_entity;
use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use std::sync::Arc;

/// 模块配置仓库实现
#[derive(Clone)]
pub struct ExtraRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ExtraRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<extra_entity::Model> for Extra {
    fn from(model: extra_entity::Model) -> Self {
        Self {
            task_type: model.task_type,
            detail: model.detail,
        }
    }
}

fn to_active_model(extra: &Extra) -> extra_entity::ActiveModel {
    extra_entity::ActiveModel {
        task_type: Set(extra.task_type.clone()),
        detail: Set(extra.detail.clone()),
    }
}

#[async_trait]
impl ExtraRepository for ExtraRepositoryImpl {
    async fn get(&self, task_type: &str) -> Result<Option<Extra>, RepositoryError> {
        let model = extra_entity::Entity::find_by_id(task_type.to_string())
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Extra>, RepositoryError> {
        let models = extra_entity::Entity::find()
            .order_by_asc(extra_entity::Column::TaskType)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn upsert(&self, extra: &Extra) -> Result<(), RepositoryError> {
        extra_entity::Entity::insert(to_active_model(extra))
            .on_conflict(
                OnConflict::column(extra_entity::Column::TaskType)
                    .update_column(extra_entity::Column::Detail)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn add_if_not_exist(&self, extra: &Extra) -> Result<bool, RepositoryError> {
        let rows = extra_entity::Entity::insert(to_active_model(extra))
            .on_conflict(
                OnConflict::column(extra_entity::Column::TaskType)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(rows > 0)
    }

    async fn remove(&self, task_type: &str) -> Result<(), RepositoryError> {
        let result = extra_entity::Entity::delete_by_id(task_type.to_string())
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
