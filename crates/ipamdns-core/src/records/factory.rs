//! Translator selection by record type tag

use super::{RecordTranslator, RecordType};
use crate::Result;
use crate::config::BackendConfig;
use crate::manipulator::ObjectManipulator;
use crate::model::RecordSet;

/// Select the translator for `recordset`'s type
///
/// An unsupported type is logged as an error. By default the caller then
/// gets `Ok(None)` and must skip the operation without touching the store;
/// with `strict_record_types` the call fails with
/// `Error::UnknownRecordType` instead.
pub fn select<'a>(
    recordset: &RecordSet,
    manipulator: &'a ObjectManipulator,
    config: &BackendConfig,
    tenant: &str,
) -> Result<Option<RecordTranslator<'a>>> {
    match recordset.record_type.parse::<RecordType>() {
        Ok(record_type) => Ok(Some(RecordTranslator::new(
            record_type,
            manipulator,
            config.view_for(tenant),
        ))),
        Err(err) => {
            tracing::error!("Unknown type {}", recordset.record_type);
            if config.strict_record_types {
                Err(err)
            } else {
                Ok(None)
            }
        }
    }
}
