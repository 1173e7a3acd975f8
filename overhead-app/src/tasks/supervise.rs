//! Waiting for the run to end

use std::future::Future;
use std::io;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

/// What ended the run
#[derive(Debug)]
pub enum Stop<T> {
    /// SIGINT or SIGTERM
    Signal,
    /// The shutdown flag was raised, e.g. by the demo script
    Flag,
    /// The render thread returned or panicked on its own
    RenderExited(Result<T, JoinError>),
}

/// Wait for a signal, the shutdown flag or the render thread, whichever
/// comes first
///
/// The render handle is borrowed so it can still be awaited after a signal
/// or flag stop. Fails only if `signal` fails, i.e. the handlers could not be
/// installed.
pub async fn wait_for_stop<T, Sig>(
    render: &mut JoinHandle<T>,
    mut shutdown: watch::Receiver<bool>,
    signal: Sig,
) -> io::Result<Stop<T>>
where
    Sig: Future<Output = io::Result<()>>,
{
    tokio::select! {
        res = signal => {
            res?;
            Ok(Stop::Signal)
        }
        _ = shutdown.wait_for(|stop| *stop) => Ok(Stop::Flag),
        res = render => Ok(Stop::RenderExited(res)),
    }
}
