use std::io;

use async_std::prelude::*;


pub const PORT: u16 = 65432;

// One logical message per newline-terminated line. The payload must not
// contain '\n' itself; the protocol has no escaping.
pub async fn write_line(writer: &mut (impl async_std::io::Write + Unpin), line: &str) -> io::Result<()> {
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    writer.write_all(buf.as_bytes()).await
}
