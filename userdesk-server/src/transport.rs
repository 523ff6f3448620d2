use crate::errors::TransportError;
use crate::service::UserDeskService;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{error, info};

/// Serves requests line by line until the reader reaches EOF.
pub async fn serve<R, W>(service: UserDeskService, reader: R, writer: W) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = FramedRead::new(reader, LinesCodec::new());
    let mut sink = FramedWrite::new(writer, LinesCodec::new());

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(LinesCodecError::Io(err)) => return Err(TransportError::Io(err)),
            Err(err) => {
                error!(%err, "Dropping unreadable line");
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        if let Some(reply) = service.handle_line(&line).await {
            sink.send(serde_json::to_string(&reply)?).await?;
        }
    }

    info!("Input closed; stopping");
    Ok(())
}
