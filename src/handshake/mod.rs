mod c0c1;
mod s0s1s2;

pub use c0c1::*;
pub use s0s1s2::*;

use crate::Result;
use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Run the client side of the simple plaintext handshake: write C0+C1,
/// read S0+S1+S2, write C2 as an echo of S1.
pub async fn client_handshake<R, W>(reader: &mut R, writer: &mut W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let c0c1 = C0C1::create();
    writer.write_all(&c0c1.encode()).await?;
    writer.flush().await?;

    let mut response = vec![0u8; 1 + 2 * HANDSHAKE_SIZE];
    reader.read_exact(&mut response).await?;
    let s0s1s2 = S0S1S2::parse(&response)?;

    let c2 = C2::from_s1(&s0s1s2);
    writer.write_all(&c2.encode()).await?;
    writer.flush().await?;

    debug!("client handshake done, peer time {}", s0s1s2.s1_timestamp);
    Ok(())
}

/// Run the server side: read C0+C1, write S0+S1+S2 with S2 echoing C1,
/// read C2. The echo is not verified; no peer verification is performed
/// in the simple handshake.
pub async fn server_handshake<R, W>(reader: &mut R, writer: &mut W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut request = vec![0u8; 1 + HANDSHAKE_SIZE];
    reader.read_exact(&mut request).await?;
    let c0c1 = C0C1::parse(&request)?;

    let s0s1s2 = S0S1S2::generate(&c0c1);
    writer.write_all(&s0s1s2.encode()).await?;
    writer.flush().await?;

    let mut c2 = vec![0u8; HANDSHAKE_SIZE];
    reader.read_exact(&mut c2).await?;
    C2::parse(&c2)?;

    debug!("server handshake done, peer time {}", c0c1.timestamp);
    Ok(())
}
