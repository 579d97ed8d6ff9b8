use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

/// Uploads a rendered report file to S3 under `key`.
///
/// `gzip` sets `Content-Encoding: gzip` so browsers fetching the object
/// inflate it transparently.
#[tracing::instrument(skip(client, body), fields(bytes = body.len()))]
pub async fn write_bytes_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: &str,
    gzip: bool,
) -> anyhow::Result<()> {
    let mut request = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type(content_type);

    if gzip {
        request = request.content_encoding("gzip");
    }

    request.send().await?;
    info!(bucket, key, "Uploaded to S3");

    Ok(())
}
