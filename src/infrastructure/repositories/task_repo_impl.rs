// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::schedule::Schedule;
use crate::domain::models::task::{Task, TaskStatus};
use crate::domain::repositories::task_repository::{
    RepositoryError, TaskChangeSet, TaskRepository,
};
use crate::infrastructure::database::entities::task as task_entity;
use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// 任务仓库实现
///
/// 基于SeaORM实现的任务数据访问层。每次写入提交后重新读取有序列表并
/// 推送给订阅者，订阅者只会看到提交后的一致状态。
#[derive(Clone)]
pub struct TaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
    /// 有序任务列表的广播
    task_list: Arc<watch::Sender<Vec<Task>>>,
}

impl TaskRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的任务仓库实例，订阅到的初始列表为空，调用 [`Self::refresh`] 加载
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let (task_list, _) = watch::channel(Vec::new());
        Self {
            db,
            task_list: Arc::new(task_list),
        }
    }

    /// 重新读取任务列表并推送给订阅者
    pub async fn refresh(&self) -> Result<(), RepositoryError> {
        let task_list = self.list_all().await?;
        self.task_list.send_replace(task_list);
        Ok(())
    }

    async fn publish(&self) {
        if let Err(e) = self.refresh().await {
            warn!("Failed to publish task list: {}", e);
        }
    }
}

impl From<task_entity::Model> for Task {
    fn from(model: task_entity::Model) -> Self {
        // 无法解析的计划/状态退回默认值，不让一条坏数据拖垮整个列表
        let schedule = serde_json::from_value(model.schedule).unwrap_or_else(|e| {
            warn!(task_id = model.id, "Invalid schedule column: {}", e);
            Schedule::default()
        });
        let status = serde_json::from_value(model.status).unwrap_or_else(|e| {
            warn!(task_id = model.id, "Invalid status column: {}", e);
            TaskStatus::default()
        });
        Self {
            id: model.id,
            name: model.name,
            task_type: model.task_type,
            detail: model.detail,
            schedule,
            order_id: model.order_id,
            status,
        }
    }
}

fn to_active_model(task: &Task) -> Result<task_entity::ActiveModel, RepositoryError> {
    Ok(task_entity::ActiveModel {
        id: if task.id == 0 { NotSet } else { Set(task.id) },
        name: Set(task.name.clone()),
        task_type: Set(task.task_type.clone()),
        detail: Set(task.detail.clone()),
        schedule: Set(serde_json::to_value(&task.schedule)?),
        order_id: Set(task.order_id),
        status: Set(serde_json::to_value(&task.status)?),
    })
}

async fn insert_task<C: ConnectionTrait>(conn: &C, task: &Task) -> Result<i64, RepositoryError> {
    let model = to_active_model(task)?;
    let result = task_entity::Entity::insert(model).exec(conn).await?;
    Ok(result.last_insert_id)
}

async fn update_task<C: ConnectionTrait>(conn: &C, task: &Task) -> Result<(), RepositoryError> {
    let model = to_active_model(task)?;
    match model.update(conn).await {
        Ok(_) => Ok(()),
        Err(DbErr::RecordNotUpdated) => Err(RepositoryError::NotFound),
        Err(e) => Err(e.into()),
    }
}

async fn set_order_id<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    order_id: i32,
) -> Result<u64, RepositoryError> {
    let result = task_entity::Entity::update_many()
        .col_expr(task_entity::Column::OrderId, Expr::value(order_id))
        .filter(task_entity::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

async fn delete_tasks<C: ConnectionTrait>(conn: &C, ids: &[i64]) -> Result<u64, RepositoryError> {
    let result = task_entity::Entity::delete_many()
        .filter(task_entity::Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    fn observe_all(&self) -> watch::Receiver<Vec<Task>> {
        self.task_list.subscribe()
    }

    fn observe(&self, id: i64) -> BoxStream<'static, Option<Task>> {
        let receiver = self.task_list.subscribe();
        stream::unfold((receiver, true), move |(mut receiver, first)| async move {
            if !first {
                receiver.changed().await.ok()?;
            }
            let task = receiver
                .borrow_and_update()
                .iter()
                .find(|task| task.id == id)
                .cloned();
            Some((task, (receiver, false)))
        })
        .boxed()
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Task>, RepositoryError> {
        let models = task_entity::Entity::find()
            .order_by_asc(task_entity::Column::OrderId)
            .order_by_asc(task_entity::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn add(&self, task: &Task) -> Result<i64, RepositoryError> {
        let id = insert_task(self.db.as_ref(), task).await?;
        self.publish().await;
        Ok(id)
    }

    async fn add_many(&self, tasks: &[Task]) -> Result<Vec<i64>, RepositoryError> {
        self.commit(TaskChangeSet {
            insert: tasks.to_vec(),
            ..Default::default()
        })
        .await
    }

    async fn update(&self, task: &Task) -> Result<(), RepositoryError> {
        update_task(self.db.as_ref(), task).await?;
        self.publish().await;
        Ok(())
    }

    async fn update_many(&self, tasks: &[Task]) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        for task in tasks {
            update_task(&txn, task).await?;
        }
        txn.commit().await?;
        self.publish().await;
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), RepositoryError> {
        let removed = delete_tasks(self.db.as_ref(), &[id]).await?;
        if removed == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.publish().await;
        Ok(())
    }

    async fn remove_many(&self, ids: &[i64]) -> Result<(), RepositoryError> {
        self.commit(TaskChangeSet {
            remove: ids.to_vec(),
            ..Default::default()
        })
        .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count = task_entity::Entity::find()
            .count(self.db.as_ref())
            .await?;
        Ok(count)
    }

    async fn update_order_id(&self, id: i64, order_id: i32) -> Result<(), RepositoryError> {
        if set_order_id(self.db.as_ref(), id, order_id).await? == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.publish().await;
        Ok(())
    }

    async fn update_status(&self, id: i64, status: &TaskStatus) -> Result<(), RepositoryError> {
        let result = task_entity::Entity::update_many()
            .col_expr(
                task_entity::Column::Status,
                Expr::value(serde_json::to_value(status)?),
            )
            .filter(task_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.publish().await;
        Ok(())
    }

    async fn update_schedule(
        &self,
        id: i64,
        schedule: &Schedule,
        status: &TaskStatus,
    ) -> Result<(), RepositoryError> {
        let result = task_entity::Entity::update_many()
            .col_expr(
                task_entity::Column::Schedule,
                Expr::value(serde_json::to_value(schedule)?),
            )
            .col_expr(
                task_entity::Column::Status,
                Expr::value(serde_json::to_value(status)?),
            )
            .filter(task_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.publish().await;
        Ok(())
    }

    async fn commit(&self, changes: TaskChangeSet) -> Result<Vec<i64>, RepositoryError> {
        if changes.is_empty() {
            return Ok(Vec::new());
        }

        // 同一事务内只能使用 txn，SQLite 连接池在事务期间可能只有这一条连接
        let txn = self.db.begin().await?;

        if !changes.remove.is_empty() {
            delete_tasks(&txn, &changes.remove).await?;
        }

        let mut inserted = Vec::with_capacity(changes.insert.len());
        for task in &changes.insert {
            inserted.push(insert_task(&txn, task).await?);
        }

        for order in &changes.reorder {
            set_order_id(&txn, order.id, order.order_id).await?;
        }

        txn.commit().await?;
        debug!(
            inserted = inserted.len(),
            removed = changes.remove.len(),
            reordered = changes.reorder.len(),
            "Task changes committed"
        );

        self.publish().await;
        Ok(inserted)
    }
}
