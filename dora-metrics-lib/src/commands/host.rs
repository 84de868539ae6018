use std::io::Write;

/// The process environment a command runs in.
///
/// Commands print progress and results through the host so tests can capture them.
pub trait Host: Send + Sync {
    /// Destination for results and progress (stdout for the real binary).
    fn output(&mut self) -> impl Write;

    /// Destination for skipped input and failures (stderr for the real binary).
    fn error(&mut self) -> impl Write;

    /// Terminate the process. Test hosts may simply return.
    fn exit(&mut self, code: i32);
}

/// Host that records everything a command prints.
#[cfg(test)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
}

#[cfg(test)]
impl TestHost {
    pub const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, _code: i32) {}
}
