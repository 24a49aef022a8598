use crate::error::EntError;
use sea_orm::DatabaseTransaction;

/// Roll back `txn` after `err`. A failed rollback is reported together with the
/// error that caused it.
pub(crate) async fn rollback(txn: DatabaseTransaction, err: EntError) -> EntError {
    match txn.rollback().await {
        Ok(()) => err,
        Err(rollback) => EntError::Rollback {
            source: Box::new(err),
            rollback,
        },
    }
}

/// Begin a transaction on `conn`, run `body` in it and commit, or roll back
/// when `body` fails.
macro_rules! in_txn {
    ($conn:expr, |$txn:ident| $body:expr) => {{
        let $txn = sea_orm::TransactionTrait::begin($conn).await?;
        let res: $crate::error::EntResult<_> = async { $body }.await;
        match res {
            Ok(value) => {
                $txn.commit().await?;
                Ok(value)
            }
            Err(err) => Err($crate::query_builders::utils::rollback($txn, err).await),
        }
    }};
}

pub(crate) use in_txn;
