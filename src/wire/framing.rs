//! Length-delimited message framing
//!
//! Each frame is a 4-byte big-endian length prefix followed by one JSON
//! payload. A read yields exactly one well-formed message or fails
//! permanently for that stream; there is no partial-read recovery.
//!
//! The inbound frame size limit is supplied by the transport
//! configuration. Outbound frames are not checked against it.

use bytes::{BufMut, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::FrameError;

/// Frame size cap applied when the transport does not supply one (4 MiB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

/// Length prefix size in bytes
const LEN_PREFIX_SIZE: usize = 4;

/// Reads one length-delimited message at a time
pub struct FrameReader<R> {
    inner: R,
    max_frame_size: usize,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wrap a stream's read half with the given inbound frame size limit
    pub fn new(inner: R, max_frame_size: usize) -> Self {
        Self {
            inner,
            max_frame_size,
        }
    }

    /// Read and decode the next frame
    ///
    /// Any error is terminal for the stream: end-of-stream, a truncated
    /// frame, an oversized length prefix or a payload that fails to
    /// decode all leave the reader unusable.
    pub async fn read_message<T: DeserializeOwned>(&mut self) -> Result<T, FrameError> {
        let mut len_buf = [0u8; LEN_PREFIX_SIZE];
        self.inner.read_exact(&mut len_buf).await?;

        let len = u32::from_be_bytes(len_buf) as usize;
        if len > self.max_frame_size {
            return Err(FrameError::TooLarge {
                size: len,
                max: self.max_frame_size,
            });
        }

        let mut payload = vec![0u8; len];
        self.inner.read_exact(&mut payload).await?;

        Ok(serde_json::from_slice(&payload)?)
    }
}

/// Writes one length-delimited message at a time
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Wrap a stream's write half
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Encode and write one frame, flushing it to the stream
    pub async fn write_message<T: Serialize>(&mut self, message: &T) -> Result<(), FrameError> {
        let payload = serde_json::to_vec(message)?;

        let mut frame = BytesMut::with_capacity(LEN_PREFIX_SIZE + payload.len());
        frame.put_u32(payload.len() as u32);
        frame.put_slice(&payload);

        self.inner.write_all(&frame).await?;
        self.inner.flush().await?;

        Ok(())
    }
}

/// Frame writer over a type-erased write half
///
/// Sessions over different stream types share one registry, so the
/// subscriber map stores writers behind this alias.
pub type BoxedFrameWriter = FrameWriter<Box<dyn AsyncWrite + Send + Unpin>>;
