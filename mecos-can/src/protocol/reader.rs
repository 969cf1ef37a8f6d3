use std::time::{Duration, Instant};
use crate::channel::{transmit, BusChannel, ChannelGuard, Filter};
use crate::error::Error;
use super::{decode, encode, ProtocolMessage, SPEED_QUERY_ANSWER_ID};

/// Overall wait for an answer, and the ceiling of a single receive call.
pub const DEFAULT_RX_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Budget for the whole receive loop, counted from just after the request is sent.
    pub deadline: Duration,
    /// Ceiling of each receive call. Clamped to what is left of `deadline`.
    pub receive_timeout: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_RX_TIMEOUT,
            receive_timeout: DEFAULT_RX_TIMEOUT,
        }
    }
}

/// How one query cycle ended. Timeouts are expected outcomes, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Actual speed in Hz.
    Answered(u16),
    /// A receive call saw no frame at all within its wait.
    ReceiveTimeout,
    /// Frames kept arriving but none matched before the deadline.
    DeadlineElapsed { elapsed: Duration },
}

impl QueryOutcome {
    #[inline]
    pub fn hz(&self) -> Option<u16> {
        match self {
            Self::Answered(hz) => Some(*hz),
            _ => None,
        }
    }

    /// Fold the timeouts into errors for callers that only care about the value.
    pub fn into_result(self, interface: &str, deadline: Duration) -> Result<u16, Error> {
        match self {
            Self::Answered(hz) => Ok(hz),
            Self::ReceiveTimeout => Err(Error::channel_timeout(interface)),
            Self::DeadlineElapsed { .. } => Err(Error::NoMatchBeforeDeadline(deadline)),
        }
    }
}

/// Run one query-then-wait cycle on a channel whose receive filter is already set.
///
/// The protocol carries no transaction identifier, and other bus masters may
/// ask the same question, so the first structurally valid answer wins.
pub fn query_actual_speed<C: BusChannel + ?Sized>(
    channel: &mut C,
    config: &ReaderConfig,
) -> Result<QueryOutcome, Error> {
    transmit(channel, &encode(&ProtocolMessage::SpeedQueryRequest))?;

    let start = Instant::now();
    loop {
        let elapsed = start.elapsed();
        let Some(remaining) = config.deadline.checked_sub(elapsed).filter(|r| !r.is_zero()) else {
            log::debug!("MECOS-CAN - {} no answer after {:?}", channel.interface(), elapsed);
            return Ok(QueryOutcome::DeadlineElapsed { elapsed });
        };

        let frame = match channel.receive(config.receive_timeout.min(remaining)) {
            Ok(frame) => frame,
            Err(Error::ReceiveTimeout(_)) => {
                log::debug!("MECOS-CAN - {} receive timed out", channel.interface());
                return Ok(QueryOutcome::ReceiveTimeout);
            },
            Err(e) => return Err(e),
        };
        log::trace!("MECOS-CAN - {} Rx {}", channel.interface(), frame);

        if let Some(ProtocolMessage::SpeedQueryAnswer { hz }) = decode(&frame) {
            return Ok(QueryOutcome::Answered(hz));
        }
    }
}

/// Own `channel` for one cycle: accept only answers, query, then release it.
pub fn read_actual_speed<C: BusChannel>(channel: C, config: &ReaderConfig) -> Result<QueryOutcome, Error> {
    let mut channel = ChannelGuard::new(channel);
    channel.set_receive_filter(&[Filter::standard(SPEED_QUERY_ANSWER_ID)])?;
    query_actual_speed(&mut *channel, config)
}
