//! S3-compatible [`ArtifactStore`] (§4.1): keys map to
//! `projects/{pid}/{sanitized_stage}/{sanitized_name}` under a configured
//! bucket/prefix. The bucket is created lazily on first write; listing
//! pages through `list_objects_v2`; deletion batches up to 1000 keys per
//! request.

use async_trait::async_trait;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;
use tokio::sync::OnceCell;

use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::ArtifactStore;
use subflow_domain::value_objects::ProjectId;

use super::artifact_key;

pub struct S3ArtifactStore {
    client: Client,
    bucket: String,
    prefix: String,
    bucket_ready: OnceCell<()>,
}

impl S3ArtifactStore {
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
            bucket_ready: OnceCell::new(),
        }
    }

    fn key(&self, project_id: ProjectId, stage: &str, name: &str) -> String {
        let base = artifact_key(&project_id.to_string(), stage, name);
        if self.prefix.is_empty() {
            base
        } else {
            format!("{}/{}", self.prefix.trim_end_matches('/'), base)
        }
    }

    async fn ensure_bucket(&self) -> SubflowResult<()> {
        self.bucket_ready
            .get_or_try_init(|| async {
                match self.client.create_bucket().bucket(&self.bucket).send().await {
                    Ok(_) => Ok(()),
                    Err(err) => match err.as_service_error() {
                        Some(CreateBucketError::BucketAlreadyOwnedByYou(_)) => Ok(()),
                        Some(CreateBucketError::BucketAlreadyExists(_)) => Ok(()),
                        _ => Err(SubflowError::artifact_store(err.to_string())),
                    },
                }
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn save(&self, project_id: ProjectId, stage: &str, name: &str, bytes: Vec<u8>) -> SubflowResult<String> {
        self.ensure_bucket().await?;
        let key = self.key(project_id, stage, name);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| SubflowError::artifact_store(e.to_string()))?;
        Ok(key)
    }

    async fn load(&self, project_id: ProjectId, stage: &str, name: &str) -> SubflowResult<Vec<u8>> {
        let key = self.key(project_id, stage, name);
        let output = self.client.get_object().bucket(&self.bucket).key(&key).send().await.map_err(|e| {
            if e.as_service_error().map(|se| se.is_no_such_key()).unwrap_or(false) {
                SubflowError::artifact_not_found(project_id.to_string(), stage, name)
            } else {
                SubflowError::artifact_store(e.to_string())
            }
        })?;

        let bytes = output.body.collect().await.map_err(|e| SubflowError::artifact_store(e.to_string()))?;
        Ok(bytes.into_bytes().to_vec())
    }

    async fn list(&self, project_id: ProjectId, stage: Option<&str>) -> SubflowResult<Vec<String>> {
        let prefix = match stage {
            Some(stage) => format!("{}/{}", self.key(project_id, stage, ""), ""),
            None => format!("projects/{}/", project_id),
        };

        let mut keys = Vec::new();
        let mut paginator = self.client.list_objects_v2().bucket(&self.bucket).prefix(&prefix).into_paginator().send();
        while let Some(page) = paginator.next().await {
            let page = page.map_err(|e| SubflowError::artifact_store(e.to_string()))?;
            for obj in page.contents() {
                if let Some(key) = obj.key() {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }

    async fn list_project_ids(&self) -> SubflowResult<Vec<ProjectId>> {
        let mut ids = Vec::new();
        let mut paginator = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix("projects/")
            .delimiter("/")
            .into_paginator()
            .send();
        while let Some(page) = paginator.next().await {
            let page = page.map_err(|e| SubflowError::artifact_store(e.to_string()))?;
            for prefix in page.common_prefixes() {
                if let Some(p) = prefix.prefix() {
                    let segment = p.trim_start_matches("projects/").trim_end_matches('/');
                    if let Ok(id) = segment.parse() {
                        ids.push(id);
                    }
                }
            }
        }
        Ok(ids)
    }

    async fn delete_project(&self, project_id: ProjectId) -> SubflowResult<u64> {
        let keys = self.list(project_id, None).await?;
        let mut deleted = 0u64;
        for chunk in keys.chunks(1000) {
            let objects: Vec<ObjectIdentifier> = chunk
                .iter()
                .filter_map(|k| ObjectIdentifier::builder().key(k).build().ok())
                .collect();
            if objects.is_empty() {
                continue;
            }
            let delete = Delete::builder().set_objects(Some(objects)).build().map_err(|e| SubflowError::artifact_store(e.to_string()))?;
            self.client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| SubflowError::artifact_store(e.to_string()))?;
            deleted += chunk.len() as u64;
        }
        Ok(deleted)
    }
}
