//! Sharing: can the document itself be redistributed freely.

use crate::error::Result;
use crate::model::{Document, License};
use crate::scorer::check::{Category, Check, Evaluation};

pub(super) fn checks() -> Vec<Check> {
    vec![Check::new(
        Category::Sharing,
        "sbom_sharable",
        "sbom document has a sharable license",
        sbom_sharable,
    )]
}

fn sbom_sharable(doc: &Document) -> Result<Evaluation> {
    let licenses = doc.licenses();
    let sharable = !licenses.is_empty() && licenses.iter().all(License::is_free_any_use);
    let ids: Vec<&str> = licenses.iter().map(License::short_id).collect();
    let description = if ids.is_empty() {
        "doc has no data license".to_string()
    } else {
        format!("doc has a sharable license: {}", ids.join(","))
    };
    Ok(Evaluation::boolean(sharable, description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::licenses;
    use crate::model::{DocumentBuilder, FileFormat, Spec, SpecFormat};

    fn doc_with_data_license(expr: &str) -> Document {
        licenses::init();
        let mut spec = Spec::new(SpecFormat::Spdx, "2.3", FileFormat::Json);
        spec.licenses = licenses::resolve(expr, &[]);
        DocumentBuilder::new(spec).build()
    }

    #[test]
    fn test_cc0_is_sharable() {
        let e = sbom_sharable(&doc_with_data_license("CC0-1.0")).expect("evaluates");
        assert_eq!(e.score, 10.0);
    }

    #[test]
    fn test_missing_or_restricted_license_is_not_sharable() {
        assert_eq!(sbom_sharable(&doc_with_data_license("")).expect("evaluates").score, 0.0);
        assert_eq!(
            sbom_sharable(&doc_with_data_license("GPL-3.0-only")).expect("evaluates").score,
            0.0
        );
    }
}
