//! Object mask syntax tree.

use std::fmt;

/// Root property names the remote API accepts at the top of a mask.
pub const ROOT_PROPERTY_NAMES: [&str; 2] = ["mask", "filterMask"];

/// One node of an object mask: a name, an optional type qualifier and
/// the child properties selected beneath it.
///
/// Children never hold two merge-compatible entries; [`add_child`]
/// folds a compatible newcomer into the existing node instead.
///
/// [`add_child`]: MaskProperty::add_child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskProperty {
    name: String,
    type_name: Option<String>,
    children: Vec<MaskProperty>,
}

impl MaskProperty {
    /// Create an untyped property with no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            children: Vec::new(),
        }
    }

    /// Create a property qualified by a remote type. An empty type name
    /// is the same as no type.
    pub fn with_type(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            name: name.into(),
            type_name: (!type_name.is_empty()).then_some(type_name),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn children(&self) -> &[MaskProperty] {
        &self.children
    }

    /// True for `mask` and `filterMask`.
    pub fn is_root(&self) -> bool {
        ROOT_PROPERTY_NAMES.contains(&self.name.as_str())
    }

    /// Two properties can merge when name and type both match.
    pub fn can_merge_with(&self, other: &MaskProperty) -> bool {
        self.name == other.name && self.type_name == other.type_name
    }

    /// Union `other`'s children into this property.
    ///
    /// Hands `other` back untouched if the two are not merge-compatible.
    pub fn merge(&mut self, other: MaskProperty) -> Result<(), MaskProperty> {
        if !self.can_merge_with(&other) {
            return Err(other);
        }
        self.add_children(other.children);
        Ok(())
    }

    /// Insert a child, merging it into a compatible existing child.
    pub fn add_child(&mut self, child: MaskProperty) {
        insert_merged(&mut self.children, child);
    }

    pub fn add_children(&mut self, children: impl IntoIterator<Item = MaskProperty>) {
        for child in children {
            self.add_child(child);
        }
    }

    /// Builder form of [`MaskProperty::add_child`].
    pub fn child(mut self, child: MaskProperty) -> Self {
        self.add_child(child);
        self
    }
}

/// Fold `property` into the first compatible entry of `list`, or append it.
pub(crate) fn insert_merged(list: &mut Vec<MaskProperty>, property: MaskProperty) {
    match list.iter_mut().find(|p| p.can_merge_with(&property)) {
        Some(existing) => {
            log::trace!("merging duplicate mask property '{}'", property.name);
            existing.add_children(property.children);
        }
        None => list.push(property),
    }
}

/// Render a list of sibling properties: bare for one, bracketed for several.
pub(crate) fn write_property_list(f: &mut fmt::Formatter<'_>, list: &[MaskProperty]) -> fmt::Result {
    match list {
        [] => Ok(()),
        [only] => write!(f, "{}", only),
        many => {
            f.write_str("[")?;
            for (i, property) in many.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", property)?;
            }
            f.write_str("]")
        }
    }
}

impl fmt::Display for MaskProperty {
    /// `name(Type)` then `.child` for a single child or
    /// `[child,child]` for several.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(type_name) = &self.type_name {
            write!(f, "({})", type_name)?;
        }
        if self.children.len() == 1 {
            f.write_str(".")?;
        }
        write_property_list(f, &self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_leaf() {
        assert_eq!(MaskProperty::new("id").to_string(), "id");
        assert_eq!(MaskProperty::with_type("mask", "SoftLayer_Account").to_string(), "mask(SoftLayer_Account)");
    }

    #[test]
    fn test_render_single_child_uses_dot() {
        let mask = MaskProperty::new("mask").child(MaskProperty::new("a"));
        assert_eq!(mask.to_string(), "mask.a");
    }

    #[test]
    fn test_render_multiple_children_uses_brackets() {
        let mask = MaskProperty::new("mask")
            .child(MaskProperty::new("a"))
            .child(MaskProperty::new("b"));
        assert_eq!(mask.to_string(), "mask[a,b]");
    }

    #[test]
    fn test_render_nested_typed() {
        let mask = MaskProperty::with_type("mask", "SoftLayer_Hardware_Server").child(
            MaskProperty::new("datacenter")
                .child(MaskProperty::new("name"))
                .child(MaskProperty::new("longName")),
        );
        assert_eq!(mask.to_string(), "mask(SoftLayer_Hardware_Server).datacenter[name,longName]");
    }

    #[test]
    fn test_empty_type_is_no_type() {
        let untyped = MaskProperty::new("a");
        let empty_typed = MaskProperty::with_type("a", "");
        assert!(untyped.can_merge_with(&empty_typed));
        assert_eq!(empty_typed.type_name(), None);
        assert_eq!(empty_typed.to_string(), "a");
    }

    #[test]
    fn test_type_distinguishes_merge_key() {
        let plain = MaskProperty::new("a");
        let typed = MaskProperty::with_type("a", "Some_Type");
        assert!(!plain.can_merge_with(&typed));
        assert!(!typed.can_merge_with(&MaskProperty::with_type("a", "Other_Type")));
        assert!(typed.can_merge_with(&MaskProperty::with_type("a", "Some_Type")));
    }

    #[test]
    fn test_add_child_merges_recursively() {
        let mut mask = MaskProperty::new("mask");
        mask.add_child(MaskProperty::new("a").child(MaskProperty::new("x")));
        mask.add_child(MaskProperty::new("b"));
        mask.add_child(MaskProperty::new("a").child(MaskProperty::new("y")));
        mask.add_child(MaskProperty::new("a").child(MaskProperty::new("x")));

        assert_eq!(mask.children().len(), 2);
        assert_eq!(mask.to_string(), "mask[a[x,y],b]");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let tree = MaskProperty::new("mask")
            .child(MaskProperty::new("a").child(MaskProperty::new("b")))
            .child(MaskProperty::new("c"));
        let mut merged = tree.clone();
        merged.merge(tree.clone()).unwrap();
        assert_eq!(merged.to_string(), tree.to_string());
        assert_eq!(merged, tree);
    }

    #[test]
    fn test_merge_rejects_incompatible() {
        let mut mask = MaskProperty::new("mask");
        let other = MaskProperty::new("filterMask").child(MaskProperty::new("a"));
        let rejected = mask.merge(other.clone()).unwrap_err();
        assert_eq!(rejected, other);
        assert!(mask.children().is_empty());
    }

    #[test]
    fn test_merge_order_is_insertion_order() {
        let mut ab = MaskProperty::new("mask").child(MaskProperty::new("a"));
        ab.merge(MaskProperty::new("mask").child(MaskProperty::new("b"))).unwrap();
        let mut ba = MaskProperty::new("mask").child(MaskProperty::new("b"));
        ba.merge(MaskProperty::new("mask").child(MaskProperty::new("a"))).unwrap();

        assert_eq!(ab.to_string(), "mask[a,b]");
        assert_eq!(ba.to_string(), "mask[b,a]");
    }

    #[test]
    fn test_is_root() {
        assert!(MaskProperty::new("mask").is_root());
        assert!(MaskProperty::new("filterMask").is_root());
        assert!(!MaskProperty::new("Mask").is_root());
    }
}
