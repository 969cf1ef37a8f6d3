#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc, thread, time::Duration};
use mecos_can::{error::Error, BusChannel, CanFrame, Filter, CAN_MTU};

/// What the mock saw, shared with the test after the channel is moved away.
#[derive(Debug, Default)]
pub struct Record {
    pub sent: Vec<CanFrame>,
    pub filters: Option<Vec<Filter>>,
    pub receive_timeouts: Vec<Duration>,
    pub closed: u32,
}

pub enum Rx {
    Frame(CanFrame),
    /// Sleep, then deliver.
    Delayed(Duration, CanFrame),
    Timeout,
    Fail(Error),
}

/// Scripted in-memory channel.
pub struct MockChannel {
    pub record: Rc<RefCell<Record>>,
    script: VecDeque<Rx>,
    /// Returned when the script runs out; `None` means time out.
    repeat: Option<(Duration, CanFrame)>,
    write_size: usize,
    frame_size: usize,
}

impl MockChannel {
    pub fn new(script: Vec<Rx>) -> Self {
        Self {
            record: Default::default(),
            script: script.into(),
            repeat: None,
            write_size: CAN_MTU,
            frame_size: CAN_MTU,
        }
    }

    pub fn repeat(mut self, delay: Duration, frame: CanFrame) -> Self {
        self.repeat = Some((delay, frame));
        self
    }

    pub fn short_write(mut self, written: usize) -> Self {
        self.write_size = written;
        self
    }

    /// Full writes take `size` bytes on this channel.
    pub fn with_frame_size(mut self, size: usize) -> Self {
        self.frame_size = size;
        self.write_size = size;
        self
    }

    pub fn record(&self) -> Rc<RefCell<Record>> {
        self.record.clone()
    }
}

impl BusChannel for MockChannel {
    fn open(_: &str) -> Result<Self, Error> {
        Ok(Self::new(vec![]))
    }

    fn interface(&self) -> &str {
        "mock0"
    }

    fn frame_size(&self) -> usize {
        self.frame_size
    }

    fn set_receive_filter(&mut self, filters: &[Filter]) -> Result<(), Error> {
        self.record.borrow_mut().filters = Some(filters.to_vec());
        Ok(())
    }

    fn send(&mut self, frame: &CanFrame) -> Result<usize, Error> {
        self.record.borrow_mut().sent.push(*frame);
        Ok(self.write_size)
    }

    fn receive(&mut self, timeout: Duration) -> Result<CanFrame, Error> {
        self.record.borrow_mut().receive_timeouts.push(timeout);
        match self.script.pop_front() {
            Some(Rx::Frame(frame)) => Ok(frame),
            Some(Rx::Delayed(delay, frame)) => {
                thread::sleep(delay);
                Ok(frame)
            },
            Some(Rx::Timeout) => Err(Error::channel_timeout(self.interface())),
            Some(Rx::Fail(e)) => Err(e),
            None => match self.repeat {
                Some((delay, frame)) => {
                    thread::sleep(delay.min(timeout));
                    Ok(frame)
                },
                None => Err(Error::channel_timeout(self.interface())),
            },
        }
    }

    fn close(&mut self) {
        self.record.borrow_mut().closed += 1;
    }
}

pub fn frame(id: u32, hex_data: &str) -> CanFrame {
    let data = hex::decode(hex_data).expect("valid hex");
    CanFrame::new(id, &data).expect("at most 8 bytes")
}
