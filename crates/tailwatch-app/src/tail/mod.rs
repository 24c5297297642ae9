//! The tail loop: copy new bytes whenever the watcher says so.


use std::io::{self, SeekFrom};

use tailwatch_common::{TailwatchError, WatchError};
use tailwatch_config::TailConfig;
use tailwatch_core::{Change, FileChanges, FileWatcher, SessionEnd};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Follows one file, writing everything appended to it into a sink.
pub struct Tailer {
    watcher: FileWatcher,
    config: TailConfig,
}

impl Tailer {
    pub fn new(watcher: FileWatcher, config: TailConfig) -> Self {
        Self { watcher, config }
    }

    /// Run until `cancel` fires, or until the file goes away when
    /// `follow_name` is off.
    pub async fn run<W>(&self, out: &mut W, cancel: &CancellationToken) -> Result<(), TailwatchError>
    where
        W: AsyncWrite + Unpin,
    {
        let path = self.watcher.path();
        let mut buf = vec![0u8; self.config.read_buffer.max(1)];

        // Skip existing content only for a file that was there when we
        // started; anything created later is new in full.
        let mut skip_existing =
            !self.config.from_start && tokio::fs::metadata(path).await.is_ok();

        loop {
            match self.watcher.block_until_exists(cancel).await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => return Ok(()),
                Err(e) => return Err(e.into()),
            }

            let mut file = match File::open(path).await {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            let meta = file.metadata().await?;
            if skip_existing {
                file.seek(SeekFrom::End(0)).await?;
                skip_existing = false;
            }

            let changes = self.watcher.change_events(cancel, &meta)?;
            match self.follow(file, changes, out, &mut buf).await? {
                Some(SessionEnd::Deleted | SessionEnd::Abandoned)
                    if self.config.follow_name && !cancel.is_cancelled() =>
                {
                    info!(path = %path.display(), "file went away, waiting for it to return");
                }
                Some(SessionEnd::Failed(source)) => {
                    return Err(WatchError::Io {
                        path: path.to_path_buf(),
                        source,
                    }
                    .into());
                }
                Some(SessionEnd::StreamClosed) => return Err(WatchError::Closed.into()),
                _ => return Ok(()),
            }
        }
    }

    /// Copy bytes for one monitoring session and report how it ended.
    ///
    /// NeedToClose ends the session early: the handle points at an unlinked
    /// file, so nothing written to the path from now on will reach it.
    /// Dropping the bus makes the monitor stop with
    /// [`SessionEnd::Abandoned`] and release its watch.
    async fn follow<W>(
        &self,
        mut file: File,
        mut changes: FileChanges,
        out: &mut W,
        buf: &mut [u8],
    ) -> Result<Option<SessionEnd>, TailwatchError>
    where
        W: AsyncWrite + Unpin,
    {
        copy_available(&mut file, out, buf).await?;

        while let Some(change) = changes.recv().await {
            match change {
                Change::Modified => {
                    copy_available(&mut file, out, buf).await?;
                }
                Change::Truncated => {
                    debug!("file truncated, rewinding");
                    file.seek(SeekFrom::Start(0)).await?;
                    copy_available(&mut file, out, buf).await?;
                }
                Change::NeedToClose => {
                    debug!("file unlinked while open, releasing handle");
                    break;
                }
                Change::Deleted => {}
            }
        }

        // Whatever was written before the session ended.
        copy_available(&mut file, out, buf).await?;
        drop(file);
        Ok(changes.outcome().await)
    }
}

/// Copy from `reader` until it reports end of file.
async fn copy_available<R, W>(reader: &mut R, out: &mut W, buf: &mut [u8]) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut copied = 0u64;
    loop {
        let n = reader.read(buf).await?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n]).await?;
        copied += n as u64;
    }
    if copied > 0 {
        out.flush().await?;
    }
    Ok(copied)
}
