//! Record type → vendor object mapping table

use std::net::Ipv4Addr;

use super::RecordType;
use crate::model::strip_root;
use crate::{Error, Result};

/// How a record type is stored on the appliance
pub struct VendorMapping {
    /// Vendor object type, e.g. `record:a`
    pub object_type: &'static str,
    /// Field holding the record value
    pub value_field: &'static str,
    /// Converts record data into the value field's content
    pub encode: fn(&str) -> Result<String>,
}

impl std::fmt::Debug for VendorMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorMapping")
            .field("object_type", &self.object_type)
            .field("value_field", &self.value_field)
            .finish_non_exhaustive()
    }
}

/// Table entry for one record type
#[derive(Debug)]
pub struct RecordMapping {
    /// Record type this entry describes
    pub record_type: RecordType,
    /// `None` when the appliance maintains these records itself
    pub vendor: Option<VendorMapping>,
}

// Indexed by `RecordType` discriminant.
static MAPPINGS: [RecordMapping; 6] = [
    RecordMapping {
        record_type: RecordType::A,
        vendor: Some(VendorMapping {
            object_type: "record:a",
            value_field: "ipv4addr",
            encode: verbatim,
        }),
    },
    RecordMapping {
        record_type: RecordType::Aaaa,
        vendor: Some(VendorMapping {
            object_type: "record:aaaa",
            value_field: "ipv6addr",
            encode: verbatim,
        }),
    },
    RecordMapping {
        record_type: RecordType::Cname,
        vendor: Some(VendorMapping {
            object_type: "record:cname",
            value_field: "canonical",
            encode: without_root,
        }),
    },
    RecordMapping {
        record_type: RecordType::Ptr,
        vendor: Some(VendorMapping {
            object_type: "record:ptr",
            value_field: "ptrdname",
            encode: reverse_mapping_name,
        }),
    },
    RecordMapping {
        record_type: RecordType::Ns,
        vendor: Some(VendorMapping {
            object_type: "record:ns",
            value_field: "nameserver",
            encode: without_root,
        }),
    },
    // SOA records are created and maintained by the appliance with the zone.
    RecordMapping {
        record_type: RecordType::Soa,
        vendor: None,
    },
];

/// Table entry for `record_type`
pub fn lookup(record_type: RecordType) -> &'static RecordMapping {
    &MAPPINGS[record_type as usize]
}

fn verbatim(data: &str) -> Result<String> {
    Ok(data.to_string())
}

fn without_root(data: &str) -> Result<String> {
    Ok(strip_root(data).to_string())
}

/// `172.25.1.1` → `1.1.25.172.in-addr.arpa`
///
/// IPv4 only; IPv6 reverse names are not supported.
pub fn reverse_mapping_name(data: &str) -> Result<String> {
    let addr: Ipv4Addr = data.parse().map_err(|_| {
        Error::invalid_input(format!(
            "PTR reverse mapping requires an IPv4 address, got '{}'",
            data
        ))
    })?;
    let mut octets = addr.octets();
    octets.reverse();
    Ok(format!(
        "{}.{}.{}.{}.in-addr.arpa",
        octets[0], octets[1], octets[2], octets[3]
    ))
}
