// Output plumbing for line-oriented reporters

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use super::style::{self, StyleAttr};

/// Capability the progress reporter writes through
pub trait LineWriter {
    /// Write to the report sink
    fn write(&mut self, buffer: &str) -> io::Result<()>;

    /// Write to the primary output, bypassing the sink and CI echo
    fn print(&mut self, buffer: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    fn color_enabled(&self) -> bool;

    fn format_with_color(&self, attrs: &[StyleAttr], buffer: &str) -> String {
        style::format_with_color(self.color_enabled(), attrs, buffer)
    }

    fn write_new_line(&mut self) -> io::Result<()> {
        self.write("\n")
    }

    fn write_with_color(&mut self, attrs: &[StyleAttr], buffer: &str) -> io::Result<()> {
        let styled = self.format_with_color(attrs, buffer);
        self.write(&styled)
    }
}

/// Shared buffer collecting everything the reporter writes while CI echo is
/// enabled
///
/// Bytes are stored as written, so a write split inside a multi-byte
/// character still decodes once the rest arrives.
#[derive(Debug, Clone, Default)]
pub struct EchoCollector {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl EchoCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn append(&self, text: &str) {
        self.append_bytes(text.as_bytes());
    }

    pub fn append_bytes(&self, bytes: &[u8]) {
        self.lock().extend_from_slice(bytes);
    }

    /// Snapshot of the collected text
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Drain the collected text
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Write for EchoCollector {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer duplicating every successful write into an [`EchoCollector`]
pub struct TeeWriter<W: Write> {
    inner: W,
    collector: EchoCollector,
}

impl<W: Write> TeeWriter<W> {
    pub fn new(inner: W, collector: EchoCollector) -> Self {
        Self { inner, collector }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.collector.append_bytes(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Escape the characters that are significant in HTML
pub fn escape_html(buffer: &str) -> String {
    buffer
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// [`LineWriter`] over an arbitrary sink, stdout by default
pub struct ConsoleWriter {
    sink: Box<dyn Write>,
    primary: Box<dyn Write>,
    color_enabled: bool,
    auto_flush: bool,
    html_escape: bool,
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl ConsoleWriter {
    /// Writer for the process standard output
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Writer for an explicit sink; primary output stays stdout
    pub fn new(sink: Box<dyn Write>) -> Self {
        Self {
            sink,
            primary: Box::new(io::stdout()),
            color_enabled: false,
            auto_flush: false,
            html_escape: false,
        }
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color_enabled = enabled;
        self
    }

    pub fn with_auto_flush(mut self, enabled: bool) -> Self {
        self.auto_flush = enabled;
        self
    }

    pub fn with_html_escape(mut self, enabled: bool) -> Self {
        self.html_escape = enabled;
        self
    }

    pub fn with_primary(mut self, primary: Box<dyn Write>) -> Self {
        self.primary = primary;
        self
    }

    /// Mirror every sink write into `collector`
    pub fn with_echo(mut self, collector: EchoCollector) -> Self {
        self.sink = Box::new(TeeWriter::new(self.sink, collector));
        self
    }
}

impl LineWriter for ConsoleWriter {
    fn write(&mut self, buffer: &str) -> io::Result<()> {
        if self.html_escape {
            self.sink.write_all(escape_html(buffer).as_bytes())?;
        } else {
            self.sink.write_all(buffer.as_bytes())?;
        }

        if self.auto_flush {
            self.sink.flush()?;
        }
        Ok(())
    }

    fn print(&mut self, buffer: &str) -> io::Result<()> {
        self.primary.write_all(buffer.as_bytes())?;
        if self.auto_flush {
            self.primary.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()?;
        self.primary.flush()
    }

    fn color_enabled(&self) -> bool {
        self.color_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_tee_writer_duplicates() {
        let collector = EchoCollector::new();
        let mut tee = TeeWriter::new(Vec::new(), collector.clone());
        tee.write_all(b"PASS\n").unwrap();

        assert_eq!(tee.into_inner(), b"PASS\n");
        assert_eq!(collector.contents(), "PASS\n");
    }

    /// Accepts at most one byte per `write` call
    struct Trickle(Vec<u8>);

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            match buf.first() {
                Some(byte) => {
                    self.0.push(*byte);
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tee_writer_partial_writes_keep_multibyte_text() {
        let collector = EchoCollector::new();
        let mut tee = TeeWriter::new(Trickle(Vec::new()), collector.clone());
        tee.write_all("héllo ✓".as_bytes()).unwrap();

        assert_eq!(tee.into_inner().0, "héllo ✓".as_bytes());
        assert_eq!(collector.contents(), "héllo ✓");
    }

    #[test]
    fn test_auto_flush_pushes_each_write_through() {
        let target = EchoCollector::new();
        let sink = io::BufWriter::new(target.clone());
        let mut writer = ConsoleWriter::new(Box::new(sink)).with_auto_flush(true);

        writer.write("PASS").unwrap();
        assert_eq!(target.contents(), "PASS");
        writer.write_new_line().unwrap();
        assert_eq!(target.contents(), "PASS\n");
    }

    #[test]
    fn test_without_auto_flush_output_waits_for_flush() {
        let target = EchoCollector::new();
        let sink = io::BufWriter::new(target.clone());
        let mut writer = ConsoleWriter::new(Box::new(sink));

        writer.write("PASS").unwrap();
        assert!(target.is_empty());

        LineWriter::flush(&mut writer).unwrap();
        assert_eq!(target.contents(), "PASS");
    }

    #[test]
    fn test_collector_take_drains() {
        let collector = EchoCollector::new();
        collector.append("abc");
        assert_eq!(collector.take(), "abc");
        assert!(collector.is_empty());
    }

    #[test]
    fn test_console_writer_to_sink() {
        let sink = EchoCollector::new();
        let mut writer = ConsoleWriter::new(Box::new(sink.clone()));
        writer.write("hello").unwrap();
        writer.write_new_line().unwrap();
        assert_eq!(sink.contents(), "hello\n");
    }

    #[test]
    fn test_console_writer_html_escape() {
        let sink = EchoCollector::new();
        let mut writer = ConsoleWriter::new(Box::new(sink.clone())).with_html_escape(true);
        writer.write("a < b").unwrap();
        assert_eq!(sink.contents(), "a &lt; b");
    }

    #[test]
    fn test_console_writer_echo_sees_escaped_text() {
        let sink = EchoCollector::new();
        let echo = EchoCollector::new();
        let mut writer = ConsoleWriter::new(Box::new(sink.clone()))
            .with_html_escape(true)
            .with_echo(echo.clone());
        writer.write("<x>").unwrap();
        assert_eq!(sink.contents(), "&lt;x&gt;");
        assert_eq!(echo.contents(), "&lt;x&gt;");
    }

    #[test]
    fn test_print_bypasses_sink_and_echo() {
        let sink = EchoCollector::new();
        let primary = EchoCollector::new();
        let echo = EchoCollector::new();
        let mut writer = ConsoleWriter::new(Box::new(sink.clone()))
            .with_primary(Box::new(primary.clone()))
            .with_echo(echo.clone());
        writer.print("trace").unwrap();

        assert_eq!(primary.contents(), "trace");
        assert!(sink.is_empty());
        assert!(echo.is_empty());
    }

    #[test]
    fn test_write_with_color() {
        let sink = EchoCollector::new();
        let mut writer = ConsoleWriter::new(Box::new(sink.clone())).with_color(true);
        writer
            .write_with_color(&[StyleAttr::FgGreen, StyleAttr::Bold], "PASS")
            .unwrap();
        assert_eq!(sink.contents(), "\x1b[32;1mPASS\x1b[0m");
    }
}
