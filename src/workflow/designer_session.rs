//! 设计会话 - 流程层
//!
//! 展示层持有的唯一状态容器。所有对会话的修改都经过这里：
//! 选择图片、编辑提示词、触发一轮生成。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::GenerativeBackend;
use crate::models::design::{CycleStage, DesignResult, Session};
use crate::models::image::SourceImage;
use crate::workflow::generation_cycle::{validate_inputs, GenerationCycle};

/// 设计会话
///
/// - 同一时间只允许一轮生成（正在进行时再次触发会被拒绝）
/// - 更换图片会立刻清空结果，正在进行的那一轮结果到达后被丢弃
/// - `generate()` 的 future 被中途丢弃时，进行中标记随之清除
pub struct DesignerSession {
    cycle: GenerationCycle,
    state: Mutex<Session>,
    /// 进行中标记放在锁外，保证 Drop 时一定能清除
    in_flight: AtomicBool,
    /// 每次更换图片加一，用于识别被放弃的那一轮
    epoch: AtomicU64,
    stage: watch::Sender<CycleStage>,
}

/// 一轮生成期间持有；无论正常结束还是 future 被丢弃，都会释放进行中标记
struct InFlightGuard<'a> {
    session: &'a DesignerSession,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.session.in_flight.store(false, Ordering::SeqCst);
        self.session.reset_stage_if_running();
    }
}

impl DesignerSession {
    pub fn new(backend: Arc<dyn GenerativeBackend>, config: &Config) -> Self {
        let (stage, _) = watch::channel(CycleStage::Idle);
        Self {
            cycle: GenerationCycle::new(backend, config),
            state: Mutex::new(Session::default()),
            in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            stage,
        }
    }

    /// 订阅阶段变化（用于展示加载状态）
    pub fn subscribe_stage(&self) -> watch::Receiver<CycleStage> {
        self.stage.subscribe()
    }

    /// 选择（或清除）源图片，上一轮的所有结果都被丢弃
    pub async fn select_image(&self, image: Option<SourceImage>) {
        let mut state = self.state.lock().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        state.source_image = image;
        state.clear_results();
    }

    pub async fn set_prompt(&self, prompt: impl Into<String>) {
        self.state.lock().await.prompt = prompt.into();
    }

    /// 当前会话快照
    pub async fn snapshot(&self) -> Session {
        let mut session = self.state.lock().await.clone();
        session.in_flight = self.in_flight.load(Ordering::SeqCst);
        session
    }

    pub async fn results(&self) -> Vec<DesignResult> {
        self.state.lock().await.results()
    }

    pub async fn can_generate(&self) -> bool {
        self.snapshot().await.can_generate()
    }

    /// 触发一轮生成
    ///
    /// 锁只在读写状态时持有，不跨越网络调用
    pub async fn generate(&self) -> AppResult<Vec<DesignResult>> {
        let (image, prompt, epoch, _guard) = {
            let mut state = self.state.lock().await;
            if self.in_flight.load(Ordering::SeqCst) {
                warn!("⚠️ 已有一轮生成正在进行，拒绝本次请求");
                return Err(AppError::CycleInFlight);
            }
            if let Err(e) = validate_inputs(state.source_image.as_ref(), &state.prompt) {
                let err = AppError::from(e);
                state.last_error = Some(err.user_message());
                return Err(err);
            }
            if self
                .in_flight
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return Err(AppError::CycleInFlight);
            }
            let guard = InFlightGuard { session: self };
            state.clear_results();
            (
                state.source_image.clone(),
                state.prompt.clone(),
                self.epoch.load(Ordering::SeqCst),
                guard,
            )
        };

        let outcome = self.cycle.run(image.as_ref(), &prompt, &self.stage).await;

        let mut state = self.state.lock().await;

        if self.epoch.load(Ordering::SeqCst) != epoch {
            info!("源图片已更换，丢弃本轮结果");
            self.stage.send_replace(CycleStage::Idle);
            return Err(AppError::CycleAbandoned);
        }

        match outcome {
            Ok(completed) => {
                state.variants = completed.variants;
                state.critiques = completed.critiques;
                Ok(state.results())
            }
            Err(e) => {
                state.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// 未走到终态就结束的一轮，把阶段退回空闲
    fn reset_stage_if_running(&self) {
        self.stage.send_if_modified(|stage| {
            if stage.is_terminal() || *stage == CycleStage::Idle {
                return false;
            }
            debug!("阶段: {} → {}（本轮被中断）", stage, CycleStage::Idle);
            *stage = CycleStage::Idle;
            true
        });
    }
}
