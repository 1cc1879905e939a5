use std::process::ExitCode;

/// Entry operation of the command tree. Consuming `self` makes each dispatcher run at most once.
#[allow(async_fn_in_trait)]
pub trait Dispatch {
    async fn dispatch(self) -> ExitCode;
}

/// Runs `dispatcher` once and returns its exit code untouched.
pub async fn bootstrap<D: Dispatch>(dispatcher: D) -> ExitCode {
    dispatcher.dispatch().await
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
    };

    use super::*;

    struct Stub {
        calls: Arc<AtomicUsize>,
        output: Arc<Mutex<Vec<u8>>>,
        exit: u8,
    }
    impl Dispatch for Stub {
        async fn dispatch(self) -> ExitCode {
            self.calls.fetch_add(1, Ordering::SeqCst);
            write!(self.output.lock().unwrap(), "ok").unwrap();
            ExitCode::from(self.exit)
        }
    }

    #[tokio::test]
    async fn test_dispatch_exactly_once() {
        let (calls, output) = (Arc::new(AtomicUsize::new(0)), Arc::new(Mutex::new(Vec::new())));
        let stub = Stub { calls: calls.clone(), output: output.clone(), exit: 0 };

        bootstrap(stub).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_output_is_only_from_dispatcher() {
        let (calls, output) = (Arc::new(AtomicUsize::new(0)), Arc::new(Mutex::new(Vec::new())));
        let stub = Stub { calls: calls.clone(), output: output.clone(), exit: 2 };

        assert_eq!(bootstrap(stub).await, ExitCode::from(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*output.lock().unwrap(), b"ok");
    }
}
