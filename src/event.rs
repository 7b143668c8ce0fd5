use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

use wrap_context::arg_context;

use chooser::FallbackResolution;

#[derive(Clone, Debug)]
pub enum Event {
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
    /// A label lookup finished on a spawned task
    Fallback(FallbackResolution),
}

/// Merges terminal input, ticks and results of background tasks into one queue.
#[derive(Debug)]
pub struct EventHandler {
    sender: mpsc::UnboundedSender<Event>,
    receiver: mpsc::UnboundedReceiver<Event>,
    handler: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate_ms);
        let (sender, receiver) = mpsc::unbounded_channel();
        let task_sender = sender.clone();

        let handler = tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);

            loop {
                let tick_delay = tick.tick();
                let crossterm_event = reader.next().fuse();

                let event = tokio::select! {
                    _ = task_sender.closed() => break,
                    _ = tick_delay => Event::Tick,
                    maybe_event = crossterm_event => match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Some(Ok(CrosstermEvent::Resize(width, height))) => {
                            Event::Resize(width, height)
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(err)) => {
                            tracing::warn!("terminal event stream failed: {}", err);
                            break;
                        }
                        None => break,
                    },
                };

                if task_sender.send(event).is_err() {
                    break;
                }
            }
        });

        Self {
            sender,
            receiver,
            handler,
        }
    }

    /// For tasks that report back into the event loop
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    pub async fn next(&mut self) -> anyhow::Result<Event> {
        let event = arg_context!(self.receiver.recv().await)?;
        anyhow::Ok(event)
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
