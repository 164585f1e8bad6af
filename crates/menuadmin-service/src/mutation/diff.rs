//! Minimal update patches.

use menuadmin_core::types::{MenuNode, NodePatch};

/// Keep only the fields of `requested` whose trimmed value differs from
/// `original`. Values that are sent are trimmed.
pub fn minimal_diff(original: &MenuNode, requested: &NodePatch) -> NodePatch {
    NodePatch {
        title: changed(Some(original.title.as_str()), requested.title.as_deref()),
        url: changed(original.url.as_deref(), requested.url.as_deref()),
        icon: changed(original.icon.as_deref(), requested.icon.as_deref()),
        caption: changed(original.caption.as_deref(), requested.caption.as_deref()),
        order: requested.order.filter(|order| *order != original.order),
    }
}

fn changed(original: Option<&str>, requested: Option<&str>) -> Option<String> {
    let requested = requested?.trim();
    let original = original.unwrap_or_default().trim();
    (requested != original).then(|| requested.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> MenuNode {
        let mut node = MenuNode::item(2, "reporte", "Reporte", "/ventas/reporte");
        node.icon = Some("chart".to_string());
        node.order = 2;
        node
    }

    #[test]
    fn test_title_only_change() {
        let requested = NodePatch {
            title: Some("Reporte Mensual".to_string()),
            url: Some("/ventas/reporte".to_string()),
            icon: Some(" chart ".to_string()),
            caption: Some(String::new()),
            order: Some(2),
        };
        let diff = minimal_diff(&node(), &requested);
        assert_eq!(
            diff,
            NodePatch {
                title: Some("Reporte Mensual".to_string()),
                ..NodePatch::default()
            }
        );
    }

    #[test]
    fn test_whitespace_only_edit_is_empty() {
        let requested = NodePatch {
            title: Some("  Reporte ".to_string()),
            ..NodePatch::default()
        };
        assert!(minimal_diff(&node(), &requested).is_empty());
    }

    #[test]
    fn test_clearing_optional_field() {
        let requested = NodePatch {
            icon: Some("   ".to_string()),
            order: Some(1),
            ..NodePatch::default()
        };
        let diff = minimal_diff(&node(), &requested);
        assert_eq!(diff.icon.as_deref(), Some(""));
        assert_eq!(diff.order, Some(1));
        assert!(diff.title.is_none());
    }
}
