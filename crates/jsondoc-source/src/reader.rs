use std::io::{self, Read};

const READ_BUFFER_SIZE: usize = 4096;

/// An iterator over the bytes of an [`io::Read`], reading in 4 KiB chunks.
///
/// Read errors are yielded as items instead of being swallowed, so the caller
/// can tell a truncated file apart from a failing one. `Interrupted` reads are
/// retried.
pub struct ReadBytes<R> {
    reader: R,
    buf: Vec<u8>,
    valid_slice_start: usize,
    valid_slice_end: usize,
}

impl<R> ReadBytes<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; READ_BUFFER_SIZE],
            valid_slice_start: 0,
            valid_slice_end: 0,
        }
    }

    /// Gives back the underlying reader. Any bytes still buffered are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for ReadBytes<R> {
    type Item = io::Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.valid_slice_start != self.valid_slice_end {
            let b = self.buf[self.valid_slice_start];
            self.valid_slice_start += 1;
            return Some(Ok(b));
        }
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => return None,
                Ok(read_len) => {
                    self.valid_slice_start = 1;
                    self.valid_slice_end = read_len;
                    return Some(Ok(self.buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
