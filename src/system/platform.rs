//! Thin wrappers over the OS calls the sampler, the kill command and the
//! input reader need.

use tokio::io::{AsyncBufRead, BufReader};

const FALLBACK_PAGE_SIZE: u64 = 4096;

#[cfg(unix)]
pub fn page_size() -> u64 {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as u64
    } else {
        FALLBACK_PAGE_SIZE
    }
}

#[cfg(not(unix))]
pub fn page_size() -> u64 {
    FALLBACK_PAGE_SIZE
}

/// Ask the OS to deliver SIGTERM. Returns once the request is accepted; the
/// target may still be running.
#[cfg(unix)]
pub fn send_terminate(pid: u32) -> std::io::Result<()> {
    let pid = libc::pid_t::try_from(pid)
        .map_err(|_| std::io::Error::from(std::io::ErrorKind::InvalidInput))?;
    if pid <= 0 {
        return Err(std::io::ErrorKind::InvalidInput.into());
    }
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub fn send_terminate(_pid: u32) -> std::io::Result<()> {
    Err(std::io::ErrorKind::Unsupported.into())
}

/// Command input for the interactive loop. Pollable descriptors (ttys, pipes)
/// are read on the runtime's own thread; anything else falls back to tokio's
/// blocking stdin.
pub fn stdin_reader() -> Box<dyn AsyncBufRead + Unpin> {
    #[cfg(unix)]
    {
        match StdinReader::new() {
            Ok(reader) => return Box::new(BufReader::new(reader)),
            Err(err) => tracing::debug!(%err, "stdin not pollable, using blocking reader"),
        }
    }
    Box::new(BufReader::new(tokio::io::stdin()))
}

#[cfg(unix)]
pub use unix_input::StdinReader;

#[cfg(unix)]
mod unix_input {
    use std::io;
    use std::os::fd::RawFd;
    use std::pin::Pin;
    use std::task::{Context, Poll, ready};

    use tokio::io::unix::AsyncFd;
    use tokio::io::{AsyncRead, Interest, ReadBuf};

    /// Reads a borrowed descriptor through the reactor without switching it
    /// to non-blocking mode, so the terminal is left as it was found.
    pub struct StdinReader {
        fd: AsyncFd<RawFd>,
    }

    impl StdinReader {
        pub fn new() -> io::Result<Self> {
            Self::from_raw_fd(libc::STDIN_FILENO)
        }

        /// The descriptor is not closed on drop; it must outlive the reader.
        /// Fails for descriptors epoll refuses, such as regular files.
        pub fn from_raw_fd(fd: RawFd) -> io::Result<Self> {
            let fd = AsyncFd::with_interest(fd, Interest::READABLE)?;
            Ok(Self { fd })
        }
    }

    fn readable_now(fd: RawFd) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let rc = unsafe { libc::poll(&mut pfd, 1, 0) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(rc > 0 && pfd.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0)
    }

    impl AsyncRead for StdinReader {
        fn poll_read(
            self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            loop {
                let mut guard = ready!(self.fd.poll_read_ready(cx))?;
                let fd = *self.fd.get_ref();

                // Readiness is edge-triggered and may be stale; a blocking
                // descriptor is only read once poll(2) says it won't block.
                match readable_now(fd) {
                    Ok(true) => {}
                    Ok(false) => {
                        guard.clear_ready();
                        continue;
                    }
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(err) => return Poll::Ready(Err(err)),
                }

                let unfilled = buf.initialize_unfilled();
                let n = unsafe { libc::read(fd, unfilled.as_mut_ptr().cast(), unfilled.len()) };
                if n < 0 {
                    let err = io::Error::last_os_error();
                    match err.kind() {
                        io::ErrorKind::Interrupted => continue,
                        io::ErrorKind::WouldBlock => {
                            guard.clear_ready();
                            continue;
                        }
                        _ => return Poll::Ready(Err(err)),
                    }
                }
                buf.advance(n as usize);
                return Poll::Ready(Ok(()));
            }
        }
    }
}
