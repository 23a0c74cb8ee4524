use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Split};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A complete input line, without its terminator. Bytes that are not
    /// valid UTF-8 come through as U+FFFD.
    Line(String),
    /// The refresh interval elapsed with no input.
    Tick,
}

/// Waits for either a line of input or the refresh timer, whichever comes
/// first. Everything runs on the caller's task; nothing is spawned.
pub struct EventHandler<R> {
    lines: Option<Split<R>>,
    tick_rate: Duration,
}

impl<R: AsyncBufRead + Unpin> EventHandler<R> {
    pub fn new(reader: R, tick_rate: Duration) -> Self {
        Self {
            lines: Some(reader.split(b'\n')),
            tick_rate,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    pub fn input_closed(&self) -> bool {
        self.lines.is_none()
    }

    pub async fn next(&mut self) -> Event {
        let sleep = tokio::time::sleep(self.tick_rate);
        tokio::pin!(sleep);

        loop {
            let Some(lines) = self.lines.as_mut() else {
                sleep.await;
                return Event::Tick;
            };

            tokio::select! {
                segment = lines.next_segment() => match segment {
                    Ok(Some(bytes)) => return Event::Line(decode_line(&bytes)),
                    Ok(None) => {
                        tracing::debug!("input closed, continuing on timer only");
                        self.lines = None;
                    }
                    Err(err) => {
                        tracing::warn!(%err, "input read failed, continuing on timer only");
                        self.lines = None;
                    }
                },
                _ = &mut sleep => return Event::Tick,
            }
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    let line = String::from_utf8_lossy(bytes);
    if matches!(line, std::borrow::Cow::Owned(_)) {
        tracing::debug!(len = bytes.len(), "input line was not valid UTF-8");
    }
    line.into_owned()
}
