//! Indexer Module Tests
//!
//! Runs real processes (`echo`, `false`) in place of `createrepo`.

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use crate::coordinator::types::PartitionId;
    use crate::indexer::command::CommandIndexer;
    use crate::indexer::types::{Indexer, IndexerError};
    use std::path::Path;

    #[tokio::test]
    async fn test_command_receives_flag_and_partition_path() {
        let indexer = CommandIndexer::new("echo", "--update");
        let partition = PartitionId::from("7/x86_64");

        let output = indexer
            .rebuild(&partition, Path::new("/srv/repo/storage/7/x86_64"))
            .await
            .unwrap();

        assert_eq!(output.stdout.trim(), "--update /srv/repo/storage/7/x86_64");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_empty_flag_is_omitted() {
        let indexer = CommandIndexer::new("echo", "");
        let partition = PartitionId::from("7/x86_64");

        let output = indexer
            .rebuild(&partition, Path::new("/srv/repo/storage/7/x86_64"))
            .await
            .unwrap();

        assert_eq!(output.stdout.trim(), "/srv/repo/storage/7/x86_64");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_an_error() {
        let indexer = CommandIndexer::new("false", "");
        let partition = PartitionId::from("7/x86_64");

        let result = indexer.rebuild(&partition, Path::new("/tmp")).await;

        match result {
            Err(IndexerError::ExitStatus { code, .. }) => assert_eq!(code, Some(1)),
            other => panic!("expected exit status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_executable_is_a_spawn_error() {
        let indexer = CommandIndexer::new("/nonexistent/createrepo", "--update");
        let partition = PartitionId::from("7/x86_64");

        let result = indexer.rebuild(&partition, Path::new("/tmp")).await;

        let err = result.unwrap_err();
        assert!(matches!(err, IndexerError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/createrepo"));
    }

    #[test]
    fn test_exit_status_message() {
        let err = IndexerError::ExitStatus {
            code: Some(2),
            stderr: "Directory must exist\n".to_string(),
        };
        assert_eq!(err.to_string(), "indexer exited with status 2: Directory must exist");

        let killed = IndexerError::ExitStatus {
            code: None,
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("a signal"));
    }
}
