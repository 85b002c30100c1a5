/// records SIGINT instead of dying while a foreground child owns the terminal
///
/// the child shares our process group, so ctrl-c reaches both of us. with a
/// handler installed we survive it and can unwind through our drop guards.
/// exec resets handled signals, so the child keeps the default disposition.
#[cfg(unix)]
mod imp {
    use std::sync::atomic::{AtomicBool, Ordering};

    static RECEIVED: AtomicBool = AtomicBool::new(false);

    extern "C" fn record(_signal: libc::c_int) {
        RECEIVED.store(true, Ordering::SeqCst);
    }

    pub struct DeferredInterrupt {
        previous: libc::sighandler_t,
    }

    impl DeferredInterrupt {
        pub fn install() -> Self {
            RECEIVED.store(false, Ordering::SeqCst);
            let handler = record as extern "C" fn(libc::c_int) as libc::sighandler_t;
            // SAFETY: the handler only stores to an atomic
            let previous = unsafe { libc::signal(libc::SIGINT, handler) };
            Self { previous }
        }

        pub fn received(&self) -> bool {
            RECEIVED.load(Ordering::SeqCst)
        }
    }

    impl Drop for DeferredInterrupt {
        fn drop(&mut self) {
            if self.previous != libc::SIG_ERR {
                // SAFETY: restores the disposition that was active before `install`
                unsafe {
                    libc::signal(libc::SIGINT, self.previous);
                }
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    pub struct DeferredInterrupt;

    impl DeferredInterrupt {
        pub fn install() -> Self {
            Self
        }

        pub fn received(&self) -> bool {
            false
        }
    }
}

pub use imp::DeferredInterrupt;
