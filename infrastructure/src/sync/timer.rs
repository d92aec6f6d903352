use std::future::Future;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

pub type Tick<'a, T> = Pin<Box<dyn Future<Output = ControlFlow<T>> + 'a>>;

/// Calls `f` on `state` right away and then once per `interval` until it breaks.
///
/// A call that outlasts the interval pushes the following ticks back instead
/// of firing the missed ones in a burst.
pub async fn every<S, T, F>(interval: Duration, state: &mut S, mut f: F) -> T
where
    F: for<'a> FnMut(&'a mut S) -> Tick<'a, T>,
{
    let mut interval = tokio::time::interval(interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        if let ControlFlow::Break(ret) = f(state).await {
            break ret;
        }
    }
}
