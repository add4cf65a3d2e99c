//! S3-compatible object storage wrapper, implementing the narrow `put` /
//! `list` / `delete` / `exists` interface spec.md §1 treats as an opaque
//! collaborator, backed by `aws-sdk-s3`.

use crate::error::ClientError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use common::config::S3SpotConfig;

pub struct S3Client {
    client: Client,
    bucket: String,
}

impl S3Client {
    pub async fn connect(spot: &S3SpotConfig) -> Result<Self, ClientError> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            &spot.access_key,
            &spot.secret_key,
            None,
            None,
            "migrator",
        );
        let mut builder = aws_sdk_s3::config::Builder::new()
            .endpoint_url(&spot.endpoint_url)
            .credentials_provider(credentials)
            .force_path_style(true);
        if let Some(region) = &spot.region_name {
            builder = builder.region(aws_sdk_s3::config::Region::new(region.clone()));
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: spot.bucket_name.clone(),
        })
    }

    /// Uploads `bytes` to `key` with the given content type.
    pub async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), ClientError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| ClientError::storage(e.to_string()))?;
        Ok(())
    }

    /// Lists every object key under `prefix`, paginating as needed.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, ClientError> {
        let mut keys = Vec::new();
        let mut continuation_token = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(&self.bucket).prefix(prefix);
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }
            let response = request.send().await.map_err(|e| ClientError::storage(e.to_string()))?;

            keys.extend(response.contents().iter().filter_map(|o| o.key().map(str::to_string)));

            if response.is_truncated().unwrap_or(false) {
                continuation_token = response.next_continuation_token().map(str::to_string);
            } else {
                break;
            }
        }

        Ok(keys)
    }

    /// True if any object exists under `prefix`.
    pub async fn exists(&self, prefix: &str) -> Result<bool, ClientError> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .max_keys(1)
            .send()
            .await
            .map_err(|e| ClientError::storage(e.to_string()))?;
        Ok(!response.contents().is_empty())
    }

    /// Deletes `keys` in as few batched requests as S3 allows (1000 per
    /// call), used by LOB sync to remove the stale side of the symmetric
    /// difference in one pass.
    pub async fn delete(&self, keys: &[String]) -> Result<(), ClientError> {
        for chunk in keys.chunks(1000) {
            let objects: Vec<aws_sdk_s3::types::ObjectIdentifier> = chunk
                .iter()
                .map(|key| {
                    aws_sdk_s3::types::ObjectIdentifier::builder()
                        .key(key)
                        .build()
                        .expect("key is always set")
                })
                .collect();

            let delete = aws_sdk_s3::types::Delete::builder()
                .set_objects(Some(objects))
                .build()
                .map_err(|e| ClientError::storage(e.to_string()))?;

            self.client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| ClientError::storage(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_large_delete_lists_into_batches_of_1000() {
        let keys: Vec<String> = (0..2500).map(|i| format!("key-{i}")).collect();
        let chunks: Vec<_> = keys.chunks(1000).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 500);
    }
}
