//! Provider listing.

use std::io::Write;

use seismic_providers::ProviderKind;

use crate::error::ClientResult;

/// Writes one line per supported provider: identifier, label, documentation.
pub fn list(out: &mut impl Write) -> ClientResult<()> {
    let mut kinds = ProviderKind::ALL.to_vec();
    kinds.sort_by_key(|k| k.as_str());

    for kind in kinds {
        writeln!(out, "{}\t{}\t{}", kind.as_str(), kind.label(), kind.documentation())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_usgs() {
        let mut out = Vec::new();
        list(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "usgs\tUSGS Earthquake Catalog API\thttps://earthquake.usgs.gov/fdsnws/event/1/\n"
        );
    }
}
