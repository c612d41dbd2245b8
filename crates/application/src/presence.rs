//! 在线状态清理
//!
//! `PresenceSweeper` 定时扫描参与者注册表，清理超过超时阈值未发送心跳的参与者，
//! 并为每个被清理的参与者写入一条离开消息。单个参与者清理失败只记录日志，
//! 不影响本轮对其他参与者的处理。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use domain::{MessageDraft, ParticipantName, Timestamp};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::{clock::Clock, error::ApplicationError, store::RoomStore};

/// 清理任务配置
#[derive(Debug, Clone, Copy)]
pub struct SweeperConfig {
    /// 两次清理之间的间隔
    pub interval: Duration,
    /// 未发送心跳超过该时长即被清理
    pub staleness_timeout: chrono::Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
            staleness_timeout: chrono::Duration::seconds(10),
        }
    }
}

/// 单轮清理结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub evicted: Vec<ParticipantName>,
    pub failed: Vec<ParticipantName>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.evicted.is_empty() && self.failed.is_empty()
    }
}

pub struct PresenceSweeper {
    store: Arc<RoomStore>,
    clock: Arc<dyn Clock>,
    config: SweeperConfig,
    running: AtomicBool,
}

/// 运行标记，离开作用域时复位
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PresenceSweeper {
    pub fn new(store: Arc<RoomStore>, clock: Arc<dyn Clock>, config: SweeperConfig) -> Self {
        Self {
            store,
            clock,
            config,
            running: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> SweeperConfig {
        self.config
    }

    /// 执行一轮清理。
    ///
    /// 本轮所有比较使用同一个 `now`。上一轮尚未结束时直接返回空结果。
    pub async fn sweep_once(&self) -> SweepReport {
        let mut report = SweepReport::default();

        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("上一轮在线状态清理尚未结束，跳过本轮");
            return report;
        }
        let _running = RunningGuard(&self.running);

        let now = self.clock.now();
        let candidates = self.store.read().await.participants.list().await;
        let candidates = match candidates {
            Ok(participants) => participants,
            Err(err) => {
                tracing::error!(error = %err, "读取参与者列表失败，跳过本轮清理");
                return report;
            }
        };

        for participant in candidates
            .into_iter()
            .filter(|participant| participant.is_stale(now, self.config.staleness_timeout))
        {
            let name = participant.name;
            match self.evict(&name, now).await {
                Ok(true) => {
                    tracing::info!(participant = %name, "参与者超时，已移出房间");
                    report.evicted.push(name);
                }
                Ok(false) => {
                    tracing::debug!(participant = %name, "参与者已刷新心跳或已离开，跳过");
                }
                Err(err) => {
                    tracing::error!(participant = %name, error = %err, "清理参与者失败");
                    report.failed.push(name);
                }
            }
        }

        report
    }

    /// 在同一个写锁临界区内移除参与者并写入离开消息。
    ///
    /// 临界区内重新检查超时，期间刚发送过心跳的参与者不会被清理。
    /// 离开消息写入失败时恢复该参与者。
    async fn evict(
        &self,
        name: &ParticipantName,
        now: Timestamp,
    ) -> Result<bool, ApplicationError> {
        let mut state = self.store.write().await;

        let still_stale = state
            .participants
            .find(name.as_str())
            .await?
            .is_some_and(|current| current.is_stale(now, self.config.staleness_timeout));
        if !still_stale {
            return Ok(false);
        }

        let Some(removed) = state.participants.remove(name.as_str()).await? else {
            return Ok(false);
        };

        if let Err(err) = state.messages.append(MessageDraft::left(name), now).await {
            if let Err(restore_err) = state.participants.register(removed).await {
                tracing::error!(
                    participant = %name,
                    error = %restore_err,
                    "恢复参与者失败"
                );
            }
            return Err(err.into());
        }

        Ok(true)
    }

    /// 每收到一个 tick 执行一轮清理，直到 tick 流结束或收到关闭信号
    pub async fn run<S>(&self, ticks: S, shutdown: CancellationToken)
    where
        S: Stream,
    {
        tokio::pin!(ticks);
        tracing::info!(
            interval_ms = self.config.interval.as_millis() as u64,
            timeout_secs = self.config.staleness_timeout.num_seconds(),
            "在线状态清理任务已启动"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                tick = ticks.next() => {
                    if tick.is_none() {
                        break;
                    }
                    let report = self.sweep_once().await;
                    if !report.is_empty() {
                        tracing::info!(
                            evicted = report.evicted.len(),
                            failed = report.failed.len(),
                            "在线状态清理完成"
                        );
                    }
                }
            }
        }

        tracing::info!("在线状态清理任务已停止");
    }

    /// 按配置的间隔启动后台清理任务
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> SweeperHandle {
        let period = self.config.interval;
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let token = shutdown.clone();
        let task = tokio::spawn(async move {
            self.run(IntervalStream::new(interval), token).await;
        });

        SweeperHandle { shutdown, task }
    }
}

/// 后台清理任务句柄
pub struct SweeperHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// 停止任务并等待其退出
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(err) = self.task.await {
            tracing::error!(error = %err, "在线状态清理任务异常退出");
        }
    }
}
