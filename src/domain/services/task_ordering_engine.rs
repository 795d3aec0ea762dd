// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::models::task::{Task, TaskOrder, NOT_YET};
use crate::domain::repositories::task_repository::{TaskChangeSet, TaskRepository};
use crate::domain::services::errors::ServiceError;

/// 任务列表界面状态
///
/// 有序任务列表、当前选中的任务ID和编辑模式开关。选中状态只存在于
/// 内存中，不会持久化。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MainState {
    /// 按 `order_id` 升序排列的任务
    pub task_list: Vec<Task>,
    /// 选中的任务ID
    pub selected_task_id: BTreeSet<i64>,
    /// 是否处于编辑模式
    pub edit_mode: bool,
}

/// 移动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// 最近一次删除的快照，只保留一份
#[derive(Debug, Clone)]
struct RecycleBin {
    tasks: Vec<Task>,
    selection: BTreeSet<i64>,
}

/// 任务排序引擎
///
/// 维护连续排序的任务列表，提供批量上移、下移、复制、删除与撤销删除。
/// 所有修改操作在整个执行期间（包括存储读写）持有同一把异步互斥锁，
/// 连续的快速调用会被串行化，交换逻辑不会看到写了一半的排序。
pub struct TaskOrderingEngine<R>
where
    R: TaskRepository + 'static,
{
    repository: Arc<R>,
    state: watch::Sender<MainState>,
    /// 引擎锁，同时保护撤销缓冲区
    task_lock: Mutex<Option<RecycleBin>>,
}

impl<R> TaskOrderingEngine<R>
where
    R: TaskRepository + 'static,
{
    /// 创建新的排序引擎
    ///
    /// 初始列表取自仓库当前推送的快照
    pub fn new(repository: Arc<R>) -> Self {
        let task_list = repository.observe_all().borrow().clone();
        let (state, _) = watch::channel(MainState {
            task_list,
            ..Default::default()
        });
        Self {
            repository,
            state,
            task_lock: Mutex::new(None),
        }
    }

    /// 当前状态快照
    pub fn state(&self) -> MainState {
        self.state.borrow().clone()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<MainState> {
        self.state.subscribe()
    }

    /// 从存储重新加载任务列表
    pub async fn load(&self) -> Result<Vec<Task>, ServiceError> {
        let task_list = self.repository.list_all().await?;
        self.state.send_modify(|state| state.task_list = task_list.clone());
        Ok(task_list)
    }

    /// 跟随存储的写入刷新任务列表
    ///
    /// 其他协作者（例如调度器更新执行状态）直接写入存储时，通过该后台
    /// 任务把最新列表同步到界面状态
    pub fn spawn_store_follower(self: &Arc<Self>) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        let mut receiver = engine.repository.observe_all();
        tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let task_list = receiver.borrow_and_update().clone();
                engine
                    .state
                    .send_modify(|state| state.task_list = task_list);
            }
            debug!("Task store closed, follower stopped");
        })
    }

    pub fn toggle_edit_mode(&self) {
        self.state.send_modify(|state| state.edit_mode = !state.edit_mode);
    }

    /// 切换单个任务的选中状态
    pub fn toggle_selection(&self, id: i64) {
        self.state.send_modify(|state| {
            if !state.selected_task_id.remove(&id) {
                state.selected_task_id.insert(id);
            }
        });
    }

    /// 全选；列表中的任务已经全部选中时取消全部选择
    ///
    /// 只统计仍在列表中的选中ID，残留的无效ID不影响判断
    pub fn select_all(&self) {
        self.state.send_modify(|state| {
            let selected = state
                .task_list
                .iter()
                .filter(|task| state.selected_task_id.contains(&task.id))
                .count();
            if selected == state.task_list.len() {
                state.selected_task_id.clear();
            } else {
                state
                    .selected_task_id
                    .extend(state.task_list.iter().map(|task| task.id));
            }
        });
    }

    /// 追加选中与锚点任务同类型的所有任务
    ///
    /// 锚点不存在时不做任何修改
    pub fn select_all_same_type(&self, anchor_id: i64) {
        self.state.send_modify(|state| {
            let Some(anchor) = state.task_list.iter().find(|task| task.id == anchor_id) else {
                return;
            };
            let task_type = anchor.task_type.clone();
            let same_type: Vec<i64> = state
                .task_list
                .iter()
                .filter(|task| task.task_type == task_type)
                .map(|task| task.id)
                .collect();
            state.selected_task_id.extend(same_type);
        });
    }

    /// 在末尾追加一个任务
    ///
    /// # 返回值
    ///
    /// 存储分配的任务ID
    pub async fn add_task(
        &self,
        name: impl Into<String>,
        task_type: impl Into<String>,
    ) -> Result<i64, ServiceError> {
        let _guard = self.task_lock.lock().await;
        let task = Task::new(name, task_type, 0);
        let ids = self.append(vec![task]).await?;
        metrics::counter!("gamebot_task_operations_total", "op" => "add").increment(1);
        Ok(ids.into_iter().next().unwrap_or_default())
    }

    /// 批量追加任务（导入），忽略传入的ID与排序序号
    pub async fn add_tasks(&self, tasks: Vec<Task>) -> Result<Vec<i64>, ServiceError> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }
        let _guard = self.task_lock.lock().await;
        let ids = self.append(tasks).await?;
        metrics::counter!("gamebot_task_operations_total", "op" => "import").increment(1);
        Ok(ids)
    }

    async fn append(&self, tasks: Vec<Task>) -> Result<Vec<i64>, ServiceError> {
        let result = async {
            let count = self.repository.count().await? as i32;
            let insert = tasks
                .into_iter()
                .enumerate()
                .map(|(index, task)| Task {
                    id: 0,
                    order_id: count + index as i32,
                    ..task
                })
                .collect();
            let ids = self
                .repository
                .commit(TaskChangeSet {
                    insert,
                    ..Default::default()
                })
                .await?;
            Ok::<_, ServiceError>(ids)
        }
        .await;
        self.finish("add", result).await
    }

    pub async fn move_selected_up(&self) -> Result<Option<i32>, ServiceError> {
        self.move_selected(Direction::Up).await
    }

    pub async fn move_selected_down(&self) -> Result<Option<i32>, ServiceError> {
        self.move_selected(Direction::Down).await
    }

    /// 选中的任务各自与相邻任务交换一位
    ///
    /// 已经贴在边界上的任务（包括被其他选中任务挡住的）原地不动。
    /// 下移时逆序处理，避免同一个任务被连续移动。
    ///
    /// # 返回值
    ///
    /// 第一个成功移动的任务的新排序序号；没有任务移动时返回 `None`
    pub async fn move_selected(&self, direction: Direction) -> Result<Option<i32>, ServiceError> {
        let _guard = self.task_lock.lock().await;
        let (mut task_list, selected) = self.snapshot();
        if selected.is_empty() {
            return Ok(None);
        }

        let down = direction == Direction::Down;
        let mut selected_index: Vec<usize> = task_list
            .iter()
            .enumerate()
            .filter(|(_, task)| selected.contains(&task.id))
            .map(|(index, _)| index)
            .collect();
        if down {
            selected_index.reverse();
        }

        let mut first_moved = None;
        let mut changed = BTreeSet::new();
        for (nth, index) in selected_index.into_iter().enumerate() {
            let wall = if down { task_list.len() - 1 - nth } else { nth };
            if index == wall {
                continue;
            }
            let target = if down { index + 1 } else { index - 1 };
            task_list.swap(index, target);
            changed.insert(index);
            changed.insert(target);
            first_moved.get_or_insert(target as i32);
        }

        let reorder = reorder_changes(&task_list, &changed);
        if reorder.is_empty() {
            return Ok(None);
        }
        debug!(?direction, changed = reorder.len(), "Moving selected tasks");

        let result = self
            .repository
            .commit(TaskChangeSet {
                reorder,
                ..Default::default()
            })
            .await
            .map_err(ServiceError::from);
        self.finish("move", result).await?;
        metrics::counter!("gamebot_task_operations_total", "op" => "move").increment(1);
        Ok(first_moved)
    }

    /// 为每个选中的任务在其后插入一个副本
    ///
    /// # 返回值
    ///
    /// 新副本的ID，按排序先后
    pub async fn duplicate_selected(&self) -> Result<Vec<i64>, ServiceError> {
        let _guard = self.task_lock.lock().await;
        let (task_list, selected) = self.snapshot();
        if selected.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_task = Vec::with_capacity(task_list.len() + selected.len());
        let mut offset = 0;
        for (index, task) in task_list.into_iter().enumerate() {
            let copy = selected
                .contains(&task.id)
                .then(|| task.duplicate((index + 1 + offset) as i32));
            all_task.push(task);
            if let Some(copy) = copy {
                all_task.push(copy);
                offset += 1;
            }
        }

        let mut changes = TaskChangeSet::default();
        for (index, task) in all_task.into_iter().enumerate() {
            if task.id == 0 {
                changes.insert.push(task);
            } else if task.order_id != index as i32 {
                changes.reorder.push(task.reordered(index as i32));
            }
        }
        if changes.insert.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            inserted = changes.insert.len(),
            renumbered = changes.reorder.len(),
            "Duplicating selected tasks"
        );

        let result = self.repository.commit(changes).await.map_err(ServiceError::from);
        let ids = self.finish("duplicate", result).await?;
        metrics::counter!("gamebot_task_operations_total", "op" => "duplicate").increment(1);
        Ok(ids)
    }

    /// 删除选中的任务并重新编号
    ///
    /// 删除前的完整列表和选中状态存入撤销缓冲区，覆盖上一次的快照
    ///
    /// # 返回值
    ///
    /// 删除的任务数量
    pub async fn remove_selected(&self) -> Result<usize, ServiceError> {
        let mut recycle = self.task_lock.lock().await;
        let (task_list, selected) = self.snapshot();
        if selected.is_empty() {
            return Ok(0);
        }

        let (selected_task, remain_task): (Vec<&Task>, Vec<&Task>) = task_list
            .iter()
            .partition(|task| selected.contains(&task.id));
        if selected_task.is_empty() {
            return Ok(0);
        }

        let changes = TaskChangeSet {
            remove: selected_task.iter().map(|task| task.id).collect(),
            reorder: remain_task
                .iter()
                .enumerate()
                .filter(|(index, task)| task.order_id != *index as i32)
                .map(|(index, task)| task.reordered(index as i32))
                .collect(),
            ..Default::default()
        };
        let removed = changes.remove.len();
        debug!(removed, renumbered = changes.reorder.len(), "Removing selected tasks");

        if let Err(e) = self.repository.commit(changes).await {
            return self.finish("remove", Err(e.into())).await;
        }

        // 删除已经落库，即使随后刷新失败也必须保留撤销快照
        *recycle = Some(RecycleBin {
            tasks: task_list,
            selection: selected,
        });
        self.state
            .send_modify(|state| state.selected_task_id.clear());
        metrics::counter!("gamebot_task_operations_total", "op" => "remove").increment(1);
        info!(removed, "Tasks removed, undo available");
        self.finish("remove", Ok(removed)).await
    }

    /// 撤销最近一次删除
    ///
    /// 被删除的任务以原ID重新插入，整个列表恢复为删除前的顺序；删除之后
    /// 新增的任务保持相对顺序排在后面。选中状态恢复为删除时的选择。
    ///
    /// # 返回值
    ///
    /// 缓冲区为空时返回 `false`
    pub async fn restore_removed(&self) -> Result<bool, ServiceError> {
        let mut recycle = self.task_lock.lock().await;
        let Some(bin) = recycle.take() else {
            return Ok(false);
        };

        let current = match self.repository.list_all().await {
            Ok(current) => current,
            Err(e) => {
                *recycle = Some(bin);
                return self.finish("restore", Err(e.into())).await;
            }
        };

        let snapshot_ids: HashSet<i64> = bin.tasks.iter().map(|task| task.id).collect();
        let current_order: HashMap<i64, i32> = current
            .iter()
            .map(|task| (task.id, task.order_id))
            .collect();

        let restored = bin
            .tasks
            .iter()
            .cloned()
            .chain(
                current
                    .iter()
                    .filter(|task| !snapshot_ids.contains(&task.id))
                    .cloned(),
            );

        let mut changes = TaskChangeSet::default();
        for (index, task) in restored.enumerate() {
            let order_id = index as i32;
            match current_order.get(&task.id) {
                Some(existing) if *existing == order_id => {}
                Some(_) => changes.reorder.push(task.reordered(order_id)),
                None => changes.insert.push(Task { order_id, ..task }),
            }
        }
        debug!(
            inserted = changes.insert.len(),
            renumbered = changes.reorder.len(),
            "Restoring removed tasks"
        );

        if let Err(e) = self.repository.commit(changes).await {
            *recycle = Some(bin);
            return self.finish("restore", Err(e.into())).await;
        }

        self.state
            .send_modify(|state| state.selected_task_id = bin.selection);
        metrics::counter!("gamebot_task_operations_total", "op" => "restore").increment(1);
        self.finish("restore", Ok(true)).await
    }

    /// 撤销缓冲区中是否有可恢复的快照
    pub async fn can_restore(&self) -> bool {
        self.task_lock.lock().await.is_some()
    }

    /// 让选中的任务立即（或在指定时间）执行
    ///
    /// # 参数
    ///
    /// * `date_time` - 覆盖的下一次开始时间，缺省为最小时间，即立即到期
    pub async fn enable_run_now(
        &self,
        date_time: Option<NaiveDateTime>,
    ) -> Result<usize, ServiceError> {
        let date_time = date_time.unwrap_or(NOT_YET);
        self.update_selected_status("enable_run_now", |_| date_time)
            .await
    }

    /// 取消立即执行，按执行计划重新计算下一次开始时间
    ///
    /// 以上一次执行结束时间作为参考时间
    pub async fn disable_run_now(&self) -> Result<usize, ServiceError> {
        self.update_selected_status("disable_run_now", |task| {
            task.schedule
                .next_date_time(task.status.last_execute_date_time.stop)
        })
        .await
    }

    async fn update_selected_status<F>(&self, op: &'static str, next: F) -> Result<usize, ServiceError>
    where
        F: Fn(&Task) -> NaiveDateTime,
    {
        let _guard = self.task_lock.lock().await;
        let (task_list, selected) = self.snapshot();
        if selected.is_empty() {
            return Ok(0);
        }

        let result = async {
            let mut changed = 0;
            for task in task_list.iter().filter(|task| selected.contains(&task.id)) {
                let mut status = task.status;
                status.next_start_date_time = next(task);
                self.repository.update_status(task.id, &status).await?;
                changed += 1;
            }
            Ok::<_, ServiceError>(changed)
        }
        .await;
        self.finish(op, result).await
    }

    fn snapshot(&self) -> (Vec<Task>, BTreeSet<i64>) {
        let state = self.state.borrow();
        let mut task_list = state.task_list.clone();
        task_list.sort_by_key(|task| task.order_id);
        (task_list, state.selected_task_id.clone())
    }

    /// 操作结束后以存储为准刷新任务列表
    ///
    /// 失败时同样重新加载，界面不会显示猜测出来的结果
    async fn finish<T>(
        &self,
        op: &'static str,
        result: Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        if let Err(e) = &result {
            error!(op, error = %e, "Task operation failed, reloading from store");
        }
        if let Err(e) = self.load().await {
            error!(op, error = %e, "Failed to reload task list");
            if result.is_ok() {
                return Err(e);
            }
        }
        result
    }
}

/// 把指定位置上序号与位置不一致的任务整理成排序更新
fn reorder_changes(task_list: &[Task], changed: &BTreeSet<usize>) -> Vec<TaskOrder> {
    changed
        .iter()
        .filter_map(|index| {
            let task = task_list.get(*index)?;
            (task.order_id != *index as i32).then(|| task.reordered(*index as i32))
        })
        .collect()
}
