use std::time::Duration;

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    #[error("MECOS-CAN - channel: {0} open failed, reason: {1}")]
    ChannelOpenError(String, String),
    #[error("MECOS-CAN - channel: {0} not opened")]
    ChannelNotOpened(String),

    #[error("MECOS-CAN - send frame incomplete, {written} of {expected} bytes written")]
    TransmitIncomplete { written: usize, expected: usize },
    #[error("MECOS-CAN - channel: {0} receive timeout")]
    ReceiveTimeout(String),
    #[error("MECOS-CAN - no matching answer within {0:?}")]
    NoMatchBeforeDeadline(Duration),

    #[error("MECOS-CAN - invalid argument: {0}")]
    InvalidArgument(String),
    #[error("MECOS-CAN - operation error: {0}")]
    OperationError(String),
    #[error("MECOS-CAN - configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    #[inline(always)]
    pub fn channel_open_failed<T: Into<String>, R: ToString>(channel: T, reason: R) -> Self {
        Self::ChannelOpenError(channel.into(), reason.to_string())
    }

    #[inline(always)]
    pub fn channel_not_opened<T: Into<String>>(channel: T) -> Self {
        Self::ChannelNotOpened(channel.into())
    }

    #[inline(always)]
    pub fn channel_timeout<T: Into<String>>(channel: T) -> Self {
        Self::ReceiveTimeout(channel.into())
    }

    #[inline(always)]
    pub fn invalid_argument<T: Into<String>>(msg: T) -> Self {
        Self::InvalidArgument(msg.into())
    }

    #[inline(always)]
    pub fn operation_error<T: ToString>(e: T) -> Self {
        Self::OperationError(e.to_string())
    }

    /// `true` for the outcomes that end a reader cycle without an answer.
    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ReceiveTimeout(_) | Self::NoMatchBeforeDeadline(_))
    }
}
