// # Record Translators
//
// Translate control-plane recordsets and records into vendor record objects.
//
// The supported record types form a closed set. Each type maps to one entry of
// the table in [`mapping`]; the translator itself is shared by all types and
// only differs in the table entry it consults.
//
// ## Correlation
//
// Vendor record objects know nothing about control-plane identifiers, so the
// `comment` field carries them: `"{recordset_id}:{record_id}"`, or just
// `"{recordset_id}"` for recordset-level operations. Update and delete find
// the object through `{view, comment}`.
//
// ## TTL
//
// A zero or absent TTL inherits the view default. That is expressed by sending
// neither `ttl` nor `use_ttl`, never by sending `use_ttl: false`.

pub mod factory;
pub mod mapping;

pub use factory::select;
pub use mapping::{RecordMapping, VendorMapping};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::manipulator::ObjectManipulator;
use crate::model::{Payload, Record, RecordSet, payload, strip_root};
use crate::{Error, Result};

/// Supported DNS record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address
    A = 0,
    /// IPv6 address
    Aaaa = 1,
    /// Canonical name
    Cname = 2,
    /// Reverse pointer
    Ptr = 3,
    /// Nameserver
    Ns = 4,
    /// Start of authority
    Soa = 5,
}

impl RecordType {
    /// Every supported record type
    pub const ALL: [RecordType; 6] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Cname,
        RecordType::Ptr,
        RecordType::Ns,
        RecordType::Soa,
    ];

    /// Type tag as used by the control plane
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Ptr => "PTR",
            RecordType::Ns => "NS",
            RecordType::Soa => "SOA",
        }
    }

    /// Vendor table entry for this type
    pub fn mapping(&self) -> &'static RecordMapping {
        mapping::lookup(*self)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        RecordType::ALL
            .into_iter()
            .find(|record_type| record_type.as_str() == tag)
            .ok_or_else(|| Error::UnknownRecordType(tag.to_string()))
    }
}

/// Correlation key stored in the vendor object's `comment` field
pub fn record_identity(recordset: &RecordSet, record: Option<&Record>) -> String {
    match record {
        Some(record) => format!("{}:{}", recordset.id, record.id),
        None => recordset.id.clone(),
    }
}

/// TTL attributes for `recordset`; empty when the view default applies
pub fn ttl_attrs(recordset: &RecordSet) -> Payload {
    match recordset.ttl {
        Some(ttl) if ttl != 0 => payload([("use_ttl", Value::Bool(true)), ("ttl", ttl.into())]),
        _ => Payload::new(),
    }
}

/// Applies recordset/record changes of one record type to the object store
///
/// Built per call; holds nothing beyond the store handle and the DNS view.
#[derive(Debug)]
pub struct RecordTranslator<'a> {
    record_type: RecordType,
    manipulator: &'a ObjectManipulator,
    view: String,
}

impl<'a> RecordTranslator<'a> {
    /// Create a translator placing records in `view`
    pub fn new(
        record_type: RecordType,
        manipulator: &'a ObjectManipulator,
        view: impl Into<String>,
    ) -> Self {
        Self {
            record_type,
            manipulator,
            view: view.into(),
        }
    }

    /// Record type handled by this translator
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// DNS view records are placed in
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Create the vendor object for `record` (or a bare recordset entry)
    pub async fn create(&self, recordset: &RecordSet, record: Option<&Record>) -> Result<()> {
        let Some(vendor) = &self.record_type.mapping().vendor else {
            tracing::warn!("Create {} record not implemented", self.record_type);
            return Ok(());
        };

        let mut identity = payload([
            ("view", self.view.as_str().into()),
            ("name", strip_root(&recordset.name).into()),
            ("comment", record_identity(recordset, record).into()),
        ]);
        if let Some(record) = record {
            identity.insert(vendor.value_field.to_string(), (vendor.encode)(&record.data)?.into());
        }

        self.manipulator
            .create_object(vendor.object_type, identity, ttl_attrs(recordset), true, None)
            .await?;
        Ok(())
    }

    /// Update one record's value, or every record of the recordset
    ///
    /// With a record, only its value changes. Without one, each record of the
    /// recordset gets the recordset's current name and TTL, one query and
    /// update per record.
    pub async fn update(&self, recordset: &RecordSet, record: Option<&Record>) -> Result<()> {
        match record {
            Some(record) => self.update_record(recordset, record).await,
            None => self.update_recordset(recordset).await,
        }
    }

    /// Delete the vendor object for `record` (or the bare recordset entry)
    pub async fn delete(&self, recordset: &RecordSet, record: Option<&Record>) -> Result<()> {
        let Some(vendor) = &self.record_type.mapping().vendor else {
            tracing::warn!("Delete {} record not implemented", self.record_type);
            return Ok(());
        };

        let query = self.correlation_query(recordset, record);
        self.manipulator
            .delete_object_by_query(vendor.object_type, &query)
            .await
    }

    async fn update_record(&self, recordset: &RecordSet, record: &Record) -> Result<()> {
        let Some(vendor) = &self.record_type.mapping().vendor else {
            tracing::warn!("Update {} record not implemented", self.record_type);
            return Ok(());
        };

        let update = payload([(vendor.value_field, (vendor.encode)(&record.data)?.into())]);
        let query = self.correlation_query(recordset, Some(record));
        self.manipulator
            .update_object_by_query(vendor.object_type, &query, &update)
            .await
    }

    async fn update_recordset(&self, recordset: &RecordSet) -> Result<()> {
        let Some(vendor) = &self.record_type.mapping().vendor else {
            tracing::warn!("Update {} recordset not implemented", self.record_type);
            return Ok(());
        };

        for record in &recordset.records {
            let mut update = payload([("name", strip_root(&recordset.name).into())]);
            update.extend(ttl_attrs(recordset));

            let query = self.correlation_query(recordset, Some(record));
            self.manipulator
                .update_object_by_query(vendor.object_type, &query, &update)
                .await?;
        }
        Ok(())
    }

    fn correlation_query(&self, recordset: &RecordSet, record: Option<&Record>) -> Payload {
        payload([
            ("view", self.view.as_str().into()),
            ("comment", record_identity(recordset, record).into()),
        ])
    }
}
