#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::spi::{self, ErrorKind, ErrorType, Operation, SpiDevice};
use mcp3208_sampler::{BusConfig, Connector, Error, Result};

#[derive(Debug, PartialEq)]
pub struct Glitch;

impl spi::Error for Glitch {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// What the simulated chip sees and answers, shared between the test and every device it opens.
#[derive(Default)]
pub struct Bench {
    /// Raw reply to every transfer. `None` makes transfers fail.
    pub reply: Cell<Option<[u8; 3]>>,
    /// Every command frame clocked out.
    pub sent: RefCell<Vec<Vec<u8>>>,
    /// Number of successful opens.
    pub opens: Cell<usize>,
    /// Number of devices dropped.
    pub closes: Cell<usize>,
}

impl Bench {
    pub fn new() -> Rc<Self> {
        Rc::default()
    }

    pub fn replying(reply: [u8; 3]) -> Rc<Self> {
        let bench = Self::new();
        bench.reply.set(Some(reply));
        bench
    }

    /// Answer with `value` in the low 12 bits and noise everywhere else.
    pub fn set_sample(&self, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.reply.set(Some([0xA5, 0b1110_0000 | high, low]));
    }
}

/// Opens devices backed by a [`Bench`], or refuses to when `available` is false.
pub struct FakeConnector {
    pub bench: Rc<Bench>,
    pub available: bool,
}

impl FakeConnector {
    pub fn new(bench: &Rc<Bench>) -> Self {
        Self {
            bench: Rc::clone(bench),
            available: true,
        }
    }

    pub fn missing(bench: &Rc<Bench>) -> Self {
        Self {
            bench: Rc::clone(bench),
            available: false,
        }
    }
}

impl Connector for FakeConnector {
    type Device = FakeDevice;

    fn connect(&mut self, config: &BusConfig) -> Result<FakeDevice> {
        if !self.available {
            return Err(Error::TransportUnavailable {
                path: config.device_path(),
                reason: "No such file or directory".into(),
            });
        }

        self.bench.opens.set(self.bench.opens.get() + 1);

        Ok(FakeDevice {
            bench: Rc::clone(&self.bench),
        })
    }
}

pub struct FakeDevice {
    bench: Rc<Bench>,
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        self.bench.closes.set(self.bench.closes.get() + 1);
    }
}

impl ErrorType for FakeDevice {
    type Error = Glitch;
}

impl SpiDevice for FakeDevice {
    fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> std::result::Result<(), Self::Error> {
        assert_eq!(operations.len(), 1, "one exchange per conversion");

        match &mut operations[0] {
            Operation::TransferInPlace(words) => {
                assert_eq!(words.len(), 3, "conversions are 3 bytes");

                self.bench.sent.borrow_mut().push(words.to_vec());

                let reply = self.bench.reply.get().ok_or(Glitch)?;
                words.copy_from_slice(&reply);
            }
            _ => panic!("Not an expected operation"),
        }

        Ok(())
    }
}
