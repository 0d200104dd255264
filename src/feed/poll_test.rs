use super::*;

const FAST: Duration = Duration::from_millis(10);

// =============================================================================
// lifecycle
// =============================================================================

#[tokio::test(start_paused = true)]
async fn start_spawns_and_is_running() {
    let mut scheduler = PollScheduler::new(FAST);
    assert!(!scheduler.is_running());
    let (tx, _rx) = mpsc::channel(1);
    scheduler.start(tx);
    assert!(scheduler.is_running());
    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn start_twice_keeps_first_timer() {
    let mut scheduler = PollScheduler::new(FAST);
    let (tx1, mut rx1) = mpsc::channel(1);
    let (tx2, mut rx2) = mpsc::channel(1);
    scheduler.start(tx1);
    scheduler.start(tx2);

    // Ticks keep flowing to the first channel; the second start was a no-op.
    assert!(rx1.recv().await.is_some());
    tokio::time::advance(FAST * 3).await;
    assert!(rx2.try_recv().is_err());
    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent() {
    let mut scheduler = PollScheduler::new(FAST);
    let (tx, _rx) = mpsc::channel(1);
    scheduler.start(tx);
    scheduler.stop();
    scheduler.stop();
    assert!(!scheduler.is_running());
}

#[tokio::test(start_paused = true)]
async fn stop_without_start_is_fine() {
    let mut scheduler = PollScheduler::new(FAST);
    scheduler.stop();
    assert!(!scheduler.is_running());
}

#[tokio::test(start_paused = true)]
async fn drop_stops_the_timer() {
    let (tx, mut rx) = mpsc::channel(1);
    {
        let mut scheduler = PollScheduler::new(FAST);
        scheduler.start(tx);
        assert!(rx.recv().await.is_some());
    }
    // Scheduler dropped: the task is aborted and the channel closes.
    assert!(rx.recv().await.is_none());
}

// =============================================================================
// tick delivery
// =============================================================================

#[tokio::test(start_paused = true)]
async fn ticks_arrive_at_the_interval() {
    let mut scheduler = PollScheduler::new(FAST);
    let (tx, mut rx) = mpsc::channel(1);
    scheduler.start(tx);
    assert!(rx.recv().await.is_some());
    assert!(rx.recv().await.is_some());
    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn no_tick_before_first_interval() {
    let mut scheduler = PollScheduler::new(Duration::from_secs(30));
    let (tx, mut rx) = mpsc::channel(1);
    scheduler.start(tx);
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(29)).await;
    tokio::task::yield_now().await;
    assert!(rx.try_recv().is_err());
    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn busy_receiver_drops_ticks_instead_of_queueing() {
    let mut scheduler = PollScheduler::new(FAST);
    // Capacity 1 and nobody draining: every further tick must be dropped.
    let (tx, mut rx) = mpsc::channel(1);
    scheduler.start(tx);
    // Let the timer task register its first deadline before advancing.
    tokio::task::yield_now().await;
    tokio::time::advance(FAST * 10).await;
    tokio::task::yield_now().await;

    // Exactly the buffered tick is there; the other nine rounds vanished.
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
    scheduler.stop();
}
