use anyhow::{Context, Result, anyhow, bail};
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tungstenite::client::IntoClientRequest;
use tungstenite::{Message, WebSocket};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Read timeout on the socket, bounds how long a cancelled link takes to notice.
const READ_POLL: Duration = Duration::from_millis(100);

pub(crate) type Socket = WebSocket<TcpStream>;

/// Outcome of one read on a link.
#[derive(Debug)]
pub(crate) enum Poll {
    Message(Message),
    Idle,
    Closed,
}

/// Open a plain `ws://` connection with a bounded connect time.
pub(crate) fn open(url: &str) -> Result<Socket> {
    let request = url
        .into_client_request()
        .with_context(|| format!("invalid websocket url {url}"))?;

    let addr = {
        let uri = request.uri();
        if uri.scheme_str() != Some("ws") {
            bail!("unsupported url {url}, only ws:// is supported");
        }
        let host = uri.host().context("websocket url has no host")?;
        let port = uri.port_u16().unwrap_or(80);
        (host, port)
            .to_socket_addrs()
            .with_context(|| format!("cannot resolve {host}:{port}"))?
            .next()
            .with_context(|| format!("no address for {host}:{port}"))?
    };

    let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)
        .with_context(|| format!("cannot connect to {addr}"))?;
    stream.set_nodelay(true)?;

    let (socket, _response) = tungstenite::client(request, stream)
        .map_err(|e| anyhow!("websocket handshake with {url} failed: {e}"))?;
    socket.get_ref().set_read_timeout(Some(READ_POLL))?;
    Ok(socket)
}

/// Read the next message, treating a read timeout as [`Poll::Idle`].
pub(crate) fn poll(socket: &mut Socket) -> Result<Poll> {
    match socket.read() {
        Ok(Message::Close(_)) => Ok(Poll::Closed),
        Ok(message) => Ok(Poll::Message(message)),
        Err(tungstenite::Error::Io(e))
            if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
        {
            Ok(Poll::Idle)
        }
        Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
            Ok(Poll::Closed)
        }
        Err(e) => Err(e).context("websocket read failed"),
    }
}

/// Close politely, ignoring errors from an already broken link.
pub(crate) fn close(socket: &mut Socket) {
    let _ = socket.close(None);
    let _ = socket.flush();
}
