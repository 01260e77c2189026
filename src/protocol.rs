//! SOAP request/response wire codec.
//!
//! RealFlight speaks an HTTP-style SOAP dialect: one POST per connection,
//! no chunking, no length-prefixed reply framing. Request completion on
//! the receive side is detected by scanning for the envelope terminator
//! substring, with the accumulation buffer capped to bound memory against
//! a peer that never terminates.
//!
//! Functions are generic over [`AsyncRead`]/[`AsyncWrite`] so tests can
//! run against in-memory [`tokio::io::duplex`] pipes instead of a live
//! simulator.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::config::REPLY_BUFFER_CAPACITY;
use crate::{LinkError, Result};

/// Literal substring marking the end of a RealFlight reply document.
pub const REPLY_TERMINATOR: &[u8] = b"</SOAP-ENV:Envelope>";

/// Build the complete wire request for one SOAP action.
///
/// The framing reproduces what RealFlight expects byte for byte: an
/// HTTP-style POST to the root path with a single-quoted `Soapaction`
/// header, followed by the SOAP envelope wrapping `<action>payload</action>`.
pub fn build_request(action: &str, payload: &str) -> String {
    let envelope = format!(
        "<?xml version='1.0' encoding='UTF-8'?>\
         <soap:Envelope xmlns:soap='http://schemas.xmlsoap.org/soap/envelope/' \
         xmlns:xsd='http://www.w3.org/2001/XMLSchema' \
         xmlns:xsi='http://www.w3.org/2001/XMLSchema-instance'>\
         <soap:Body>\
         <{action}>{payload}</{action}>\
         </soap:Body>\
         </soap:Envelope>"
    );

    format!(
        "POST / HTTP/1.1\r\n\
         Soapaction: '{action}'\r\n\
         Content-Length: {len}\r\n\
         Content-Type: text/xml;charset=utf-8\r\n\
         \r\n\
         {envelope}",
        len = envelope.len()
    )
}

/// Send one complete request on `socket`.
///
/// Any write failure makes the socket unusable; the caller must drop it.
pub async fn send<S>(socket: &mut S, action: &str, payload: &str) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    let request = build_request(action, payload);
    trace!(action, bytes = request.len(), "Sending request");

    socket.write_all(request.as_bytes()).await.map_err(|e| LinkError::send_failed(action, e))?;
    socket.flush().await.map_err(|e| LinkError::send_failed(action, e))?;
    Ok(())
}

/// Read one reply from `socket`, waiting at most `timeout`.
///
/// Accumulates bytes until the [`REPLY_TERMINATOR`] substring appears, the
/// buffer reaches [`REPLY_BUFFER_CAPACITY`], or the peer stops sending.
/// Bytes already received when the deadline fires are returned best-effort;
/// a deadline with nothing received is a timeout, and a peer that closes
/// without sending anything is a connection error. The socket is single-use
/// either way and must be dropped by the caller after this call.
pub async fn receive<S>(socket: &mut S, timeout: Duration) -> Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut reply = Vec::with_capacity(REPLY_BUFFER_CAPACITY);
    let completed = tokio::time::timeout(timeout, read_reply(socket, &mut reply)).await.is_ok();

    trace!(bytes = reply.len(), completed, "Reply read finished");

    if !reply.is_empty() {
        Ok(reply)
    } else if completed {
        Err(LinkError::connection_failed("remote peer", "closed before sending any reply"))
    } else {
        Err(LinkError::timed_out(timeout))
    }
}

/// Accumulate reply bytes until terminator, capacity, or end of stream.
///
/// Read errors end accumulation the same way a peer close does; whatever
/// arrived before the error is kept for best-effort extraction.
async fn read_reply<S>(socket: &mut S, reply: &mut Vec<u8>)
where
    S: AsyncRead + Unpin,
{
    let mut chunk = [0u8; 512];

    while reply.len() < REPLY_BUFFER_CAPACITY {
        let room = (REPLY_BUFFER_CAPACITY - reply.len()).min(chunk.len());
        match socket.read(&mut chunk[..room]).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                reply.extend_from_slice(&chunk[..n]);
                if contains_terminator(reply) {
                    break;
                }
            }
        }
    }
}

/// Whether the accumulated buffer contains the reply terminator.
fn contains_terminator(buffer: &[u8]) -> bool {
    buffer.windows(REPLY_TERMINATOR.len()).any(|window| window == REPLY_TERMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: Duration = Duration::from_millis(100);

    fn sample_reply() -> Vec<u8> {
        b"<?xml version='1.0' encoding='UTF-8'?>\
          <SOAP-ENV:Envelope><SOAP-ENV:Body>\
          <m-airspeed_MPS>12.5</m-airspeed_MPS>\
          </SOAP-ENV:Body></SOAP-ENV:Envelope>"
            .to_vec()
    }

    #[test]
    fn request_framing_is_exact() {
        let request = build_request("ExchangeData", "<pControlInputs></pControlInputs>");

        assert!(request.starts_with("POST / HTTP/1.1\r\n"));
        assert!(request.contains("Soapaction: 'ExchangeData'\r\n"));
        assert!(request.contains("Content-Type: text/xml;charset=utf-8\r\n\r\n"));

        let (headers, body) = request.split_once("\r\n\r\n").expect("blank line present");
        let declared: usize = headers
            .lines()
            .find_map(|line| line.strip_prefix("Content-Length: "))
            .expect("content length header")
            .parse()
            .expect("numeric content length");
        assert_eq!(declared, body.len());

        assert!(body.starts_with("<?xml version='1.0' encoding='UTF-8'?>"));
        assert!(body.contains("<ExchangeData><pControlInputs></pControlInputs></ExchangeData>"));
        assert!(body.ends_with("</soap:Envelope>"));
    }

    #[tokio::test]
    async fn send_writes_full_request() {
        let (mut client, mut server) = tokio::io::duplex(8192);

        send(&mut client, "InjectUAVControllerInterface", "<a>1</a><b>2</b>")
            .await
            .expect("send over duplex");
        drop(client);

        let mut received = Vec::new();
        server.read_to_end(&mut received).await.expect("read request");
        let text = String::from_utf8(received).expect("request is utf-8");
        assert!(text.contains("Soapaction: 'InjectUAVControllerInterface'"));
        assert!(text.contains("<a>1</a><b>2</b>"));
    }

    #[tokio::test]
    async fn receive_stops_at_terminator() {
        let (mut client, mut server) = tokio::io::duplex(8192);

        let reply = sample_reply();
        server.write_all(&reply).await.expect("write reply");
        // Peer keeps the connection open; terminator detection must end the read

        let received = receive(&mut client, FAST).await.expect("receive full reply");
        assert_eq!(received, reply);
    }

    #[tokio::test]
    async fn receive_handles_terminator_split_across_reads() {
        let (mut client, mut server) = tokio::io::duplex(8192);

        let reply = sample_reply();
        let (head, tail) = reply.split_at(reply.len() - 8);
        let head = head.to_vec();
        let tail = tail.to_vec();
        tokio::spawn(async move {
            server.write_all(&head).await.expect("write head");
            tokio::time::sleep(Duration::from_millis(20)).await;
            server.write_all(&tail).await.expect("write tail");
            // hold the connection open past the deadline
            tokio::time::sleep(Duration::from_secs(1)).await;
            drop(server);
        });

        let received = receive(&mut client, Duration::from_millis(500)).await.expect("receive");
        assert_eq!(received, reply);
    }

    #[tokio::test]
    async fn receive_times_out_when_peer_is_silent() {
        let (mut client, _server) = tokio::io::duplex(8192);

        let result = receive(&mut client, FAST).await;
        assert!(matches!(result, Err(LinkError::Timeout { .. })));
    }

    #[tokio::test]
    async fn receive_returns_partial_bytes_on_deadline() {
        let (mut client, mut server) = tokio::io::duplex(8192);

        server.write_all(b"<SOAP-ENV:Envelope><m-airspeed_MPS>3.0").await.expect("write");
        // No terminator and no close; the deadline fires with bytes in hand

        let received = receive(&mut client, FAST).await.expect("partial reply is not an error");
        assert_eq!(received, b"<SOAP-ENV:Envelope><m-airspeed_MPS>3.0");
    }

    #[tokio::test]
    async fn receive_truncates_at_buffer_capacity() {
        let (mut client, mut server) = tokio::io::duplex(REPLY_BUFFER_CAPACITY * 2);

        // More than a buffer's worth with no terminator anywhere
        let flood = vec![b'x'; REPLY_BUFFER_CAPACITY + 500];
        server.write_all(&flood).await.expect("write flood");

        let received = receive(&mut client, FAST).await.expect("truncation is not an error");
        assert_eq!(received.len(), REPLY_BUFFER_CAPACITY);
    }

    #[tokio::test]
    async fn receive_fails_on_silent_close() {
        let (mut client, server) = tokio::io::duplex(8192);
        drop(server);

        let result = receive(&mut client, FAST).await;
        assert!(matches!(result, Err(LinkError::Connection { .. })));
    }

    #[test]
    fn terminator_detection() {
        assert!(contains_terminator(b"data</SOAP-ENV:Envelope>"));
        assert!(contains_terminator(b"</SOAP-ENV:Envelope>trailing"));
        assert!(!contains_terminator(b"</SOAP-ENV:Envelope"));
        assert!(!contains_terminator(b""));
    }
}
