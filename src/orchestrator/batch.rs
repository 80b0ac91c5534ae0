//! 批量并发原语
//!
//! 两种"N 个独立任务 → 全部等待"的组合子：
//!
//! - [`join_all_fail_fast`]：任一失败立即整批失败，其余结果丢弃
//! - [`join_all_isolated`]：每个任务的失败单独恢复，整批一定成功
//!
//! 两者都在当前任务内协作式并发（不 spawn），结果按输入顺序排列而不是完成顺序。

use futures::future::{join_all, try_join_all};
use std::future::Future;

/// 整批失败：第一个失败任务的序号和错误
#[derive(Debug)]
pub struct BatchFailure<E> {
    pub index: usize,
    pub error: E,
}

/// 并发等待全部任务，任一失败则立即返回该错误
///
/// 失败后其余未完成的任务被直接丢弃
pub async fn join_all_fail_fast<I, F, T, E>(tasks: I) -> Result<Vec<T>, BatchFailure<E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let indexed = tasks.into_iter().enumerate().map(|(index, task)| async move {
        task.await.map_err(|error| BatchFailure { index, error })
    });
    try_join_all(indexed).await
}

/// 并发等待全部任务，失败的位置用 `recover` 的返回值替代
pub async fn join_all_isolated<I, F, T, E, R>(tasks: I, recover: R) -> Vec<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
    R: Fn(usize, E) -> T,
{
    join_all(tasks)
        .await
        .into_iter()
        .enumerate()
        .map(|(index, result)| result.unwrap_or_else(|error| recover(index, error)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{pending, BoxFuture};
    use futures::FutureExt;
    use std::time::Duration;
    use tokio::time::sleep;

    fn delayed(value: usize, delay_ms: u64) -> BoxFuture<'static, Result<usize, String>> {
        async move {
            sleep(Duration::from_millis(delay_ms)).await;
            Ok(value)
        }
        .boxed()
    }

    fn failing(message: &str, delay_ms: u64) -> BoxFuture<'static, Result<usize, String>> {
        let message = message.to_string();
        async move {
            sleep(Duration::from_millis(delay_ms)).await;
            Err(message)
        }
        .boxed()
    }

    #[tokio::test]
    async fn test_fail_fast_keeps_input_order() {
        // 完成顺序与输入顺序相反
        let tasks = vec![delayed(0, 40), delayed(1, 30), delayed(2, 20), delayed(3, 10)];
        let values = join_all_fail_fast(tasks).await.unwrap();
        assert_eq!(values, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fail_fast_reports_failing_index() {
        let tasks = vec![delayed(0, 5), failing("boom", 10), delayed(2, 5)];
        let failure = join_all_fail_fast(tasks).await.unwrap_err();
        assert_eq!(failure.index, 1);
        assert_eq!(failure.error, "boom");
    }

    #[tokio::test]
    async fn test_fail_fast_does_not_wait_for_stragglers() {
        let never: BoxFuture<'static, Result<usize, String>> = pending().boxed();
        let tasks = vec![never, failing("early", 1)];

        let result = tokio::time::timeout(Duration::from_secs(5), join_all_fail_fast(tasks)).await;
        let failure = result.expect("应立即失败").unwrap_err();
        assert_eq!(failure.index, 1);
    }

    #[tokio::test]
    async fn test_isolated_recovers_per_item() {
        let tasks = vec![delayed(10, 30), failing("bad json", 5), delayed(30, 1)];
        let values = join_all_isolated(tasks, |index, _err| 100 + index).await;
        assert_eq!(values, vec![10, 101, 30]);
    }

    #[tokio::test]
    async fn test_empty_batches() {
        let tasks: Vec<BoxFuture<'static, Result<usize, String>>> = Vec::new();
        assert!(join_all_fail_fast(tasks).await.unwrap().is_empty());

        let tasks: Vec<BoxFuture<'static, Result<usize, String>>> = Vec::new();
        assert!(join_all_isolated(tasks, |_, _| 0).await.is_empty());
    }
}
