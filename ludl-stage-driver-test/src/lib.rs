
use std::{
    cell::{Cell, RefCell},
    io::{Read, Write},
    rc::Rc,
};

// used to mock a serial port to test the stage driver
// the idea is that read contains bytes the controller "sent" and write the bytes
// the driver is expected to send. once they are written/read they are removed
// from the corresponding buffer. if the buffers were empty we panic and if the
// content in write didnt match what is being written we panic as well.
// add_read and add_write add bytes to the corresponding buffers
//
// a reply only becomes visible to the driver once everything queued in write
// before it has been written. that way the driver can't read the answer to a
// command it hasn't sent yet, same as with the real controller
//
// it doesn't need to be fast nor pretty nor efficient, its just for testing. it
// needs to be easy
pub struct Interface {
    read: Rc<RefCell<Vec<u8>>>,
    write: Rc<RefCell<Vec<u8>>>,
    // (bytes of write that have to be gone, reply) pairs not yet released
    held: Rc<RefCell<Vec<(usize, Vec<u8>)>>>,
    written: Rc<Cell<usize>>,
    queued: Rc<Cell<usize>>,
}

impl Interface {
    pub fn new() -> Self {
        Interface {
            read: Rc::new(RefCell::new(Vec::new())),
            write: Rc::new(RefCell::new(Vec::new())),
            held: Rc::new(RefCell::new(Vec::new())),
            written: Rc::new(Cell::new(0)),
            queued: Rc::new(Cell::new(0)),
        }
    }

    fn release(&self) {
        let written = self.written.get();
        let mut held = self.held.borrow_mut();
        let mut read = self.read.borrow_mut();
        while held.first().map_or(false, |(at, _)| *at <= written) {
            let (_, r) = held.remove(0);
            read.extend_from_slice(&r);
        }
    }

    /// Bytes the controller sends, released after every write queued so far
    pub fn add_read(&mut self, buf: &[u8]) {
        self.held
            .borrow_mut()
            .push((self.queued.get(), buf.to_vec()));
        self.release();
    }

    /// Bytes the driver is expected to send next
    pub fn add_write(&mut self, buf: &[u8]) {
        self.write.borrow_mut().extend_from_slice(buf);
        self.queued.set(self.queued.get() + buf.len());
    }

    /// Expects `cmd` to be written and answers it with `reply`
    pub fn add_exchange(&mut self, cmd: &[u8], reply: &[u8]) {
        self.add_write(cmd);
        self.add_read(reply);
    }

    /// Number of bytes the driver could read right now
    pub fn pending(&self) -> usize {
        self.read.borrow().len()
    }

    /// Returns `true` if everything expected was written and everything sent
    /// was read
    pub fn is_empty(&self) -> bool {
        self.read.borrow().is_empty()
            && self.write.borrow().is_empty()
            && self.held.borrow().is_empty()
    }
}

impl Default for Interface {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for Interface {
    fn read(&mut self, mut buf: &mut [u8]) -> std::io::Result<usize> {
        let mut q = self.read.borrow_mut();
        if q.is_empty() {
            panic!("read was empty")
        } else if buf.len() > q.len() {
            buf.write_all(&q)?;
            let res = q.len();
            q.drain(..);
            Ok(res)
        } else {
            // write_all shrinks buf, so remember how much it could hold
            let n = buf.len();
            buf.write_all(&q[..n])?;
            q.drain(..n);
            Ok(n)
        }
    }
}

impl Write for Interface {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        {
            let mut q = self.write.borrow_mut();
            if q.is_empty() {
                panic!("write was empty, tried to write {:?}", String::from_utf8_lossy(buf))
            } else if q.starts_with(buf) {
                q.drain(..buf.len());
            } else {
                panic!(
                    "write didn't start with {:?}, write was {:?}",
                    String::from_utf8_lossy(buf),
                    String::from_utf8_lossy(&q)
                )
            }
        }
        self.written.set(self.written.get() + buf.len());
        self.release();
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Clone for Interface {
    fn clone(&self) -> Self {
        Interface {
            read: Rc::clone(&self.read),
            write: Rc::clone(&self.write),
            held: Rc::clone(&self.held),
            written: Rc::clone(&self.written),
            queued: Rc::clone(&self.queued),
        }
    }
}
