use crate::common::{Emitter, Event};
use futures::Stream;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Bytes handed to the transport across every file of one request.
#[derive(Debug)]
pub(crate) struct UploadCounter {
    loaded: AtomicU64,
    total: u64,
    emitter: Emitter,
}

impl UploadCounter {
    pub fn new(total: u64, emitter: Emitter) -> Arc<Self> {
        Arc::new(Self {
            loaded: AtomicU64::new(0),
            total,
            emitter,
        })
    }

    fn advance(&self, n: usize) {
        let loaded = self.loaded.fetch_add(n as u64, Ordering::SeqCst) + n as u64;

        self.emitter.emit(Event::UploadProgress {
            loaded,
            total: self.total,
        });
    }

    #[cfg(test)]
    pub fn loaded(&self) -> u64 {
        self.loaded.load(Ordering::SeqCst)
    }
}

/// File body that reports every chunk it yields to an [`UploadCounter`].
#[derive(Debug)]
pub(crate) struct CountingFile {
    file: File,
    buf: Box<[u8]>,
    counter: Arc<UploadCounter>,
    done: bool,
}

impl CountingFile {
    pub fn new(file: File, counter: Arc<UploadCounter>) -> Self {
        Self {
            file,
            buf: vec![0; READ_BUFFER_SIZE].into_boxed_slice(),
            counter,
            done: false,
        }
    }
}

impl Stream for CountingFile {
    type Item = io::Result<Vec<u8>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.done {
            return Poll::Ready(None);
        }

        let mut read_buf = ReadBuf::new(&mut this.buf);

        match Pin::new(&mut this.file).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => {
                this.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(Ok(())) => {
                let chunk = read_buf.filled().to_vec();

                if chunk.is_empty() {
                    this.done = true;
                    return Poll::Ready(None);
                }

                this.counter.advance(chunk.len());
                Poll::Ready(Some(Ok(chunk)))
            }
        }
    }
}
