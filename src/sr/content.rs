//! SR content items in naturalized DICOM JSON form.
//!
//! Sequences in naturalized JSON show up either as arrays or, when they hold a
//! single item, as a bare object. Both spellings are accepted on input;
//! output always uses arrays for content sequences and bare objects for
//! single-item code sequences.

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::CodedConcept;

/// Value type of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    /// Grouping item
    Container,
    /// Free text
    Text,
    /// Coded concept
    Code,
    /// Numeric measurement
    Num,
    /// 2D spatial coordinates on an image
    Scoord,
    /// 3D spatial coordinates in a frame of reference
    Scoord3d,
    /// UID reference
    Uidref,
    /// Image reference
    Image,
    /// Any value type this codec does not interpret
    #[serde(other)]
    Other,
}

/// Graphic type of a spatial coordinate item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GraphicType {
    /// A single point
    Point,
    /// Unconnected points
    Multipoint,
    /// Connected line segments
    Polyline,
    /// Closed polygon
    Polygon,
    /// Circle given by centre and a perimeter point
    Circle,
    /// Ellipse given by its axes' end points
    Ellipse,
}

/// Reference to the SOP instance (image) a coordinate item was drawn on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedSop {
    /// SOP Class UID of the referenced image
    #[serde(
        rename = "ReferencedSOPClassUID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sop_class_uid: Option<String>,
    /// SOP Instance UID of the referenced image
    #[serde(rename = "ReferencedSOPInstanceUID")]
    pub sop_instance_uid: String,
    /// Frame within a multi-frame image
    #[serde(
        rename = "ReferencedFrameNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub frame_number: Option<u32>,
}

impl ReferencedSop {
    /// Reference a single-frame image.
    pub fn new(sop_class_uid: Option<String>, sop_instance_uid: impl Into<String>) -> Self {
        Self {
            sop_class_uid,
            sop_instance_uid: sop_instance_uid.into(),
            frame_number: None,
        }
    }
}

/// One node of an SR content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Relationship to the parent item (e.g. "CONTAINS", "INFERRED FROM")
    #[serde(
        rename = "RelationshipType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relationship_type: Option<String>,

    /// Value type
    #[serde(rename = "ValueType")]
    pub value_type: ValueType,

    /// What this item is
    #[serde(
        rename = "ConceptNameCodeSequence",
        default,
        deserialize_with = "first_of_sequence",
        skip_serializing_if = "Option::is_none"
    )]
    pub concept_name: Option<CodedConcept>,

    /// Value of a CODE item
    #[serde(
        rename = "ConceptCodeSequence",
        default,
        deserialize_with = "first_of_sequence",
        skip_serializing_if = "Option::is_none"
    )]
    pub concept_code: Option<CodedConcept>,

    /// Value of a TEXT item
    #[serde(rename = "TextValue", default, skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,

    /// Value of a UIDREF item
    #[serde(rename = "UID", default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Graphic type of a SCOORD/SCOORD3D item
    #[serde(rename = "GraphicType", default, skip_serializing_if = "Option::is_none")]
    pub graphic_type: Option<GraphicType>,

    /// Flat coordinate list of a SCOORD/SCOORD3D item
    #[serde(rename = "GraphicData", default, skip_serializing_if = "Option::is_none")]
    pub graphic_data: Option<Vec<f64>>,

    /// Frame of reference of a SCOORD3D item
    #[serde(
        rename = "ReferencedFrameOfReferenceUID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub referenced_frame_of_reference_uid: Option<String>,

    /// Referenced image of an IMAGE item
    #[serde(
        rename = "ReferencedSOPSequence",
        default,
        deserialize_with = "first_of_sequence",
        skip_serializing_if = "Option::is_none"
    )]
    pub referenced_sop: Option<ReferencedSop>,

    /// Child items
    #[serde(
        rename = "ContentSequence",
        default,
        deserialize_with = "sequence",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub content_sequence: Vec<ContentItem>,
}

impl ContentItem {
    /// Create an empty item of the given type.
    pub fn new(value_type: ValueType) -> Self {
        Self {
            relationship_type: None,
            value_type,
            concept_name: None,
            concept_code: None,
            text_value: None,
            uid: None,
            graphic_type: None,
            graphic_data: None,
            referenced_frame_of_reference_uid: None,
            referenced_sop: None,
            content_sequence: Vec::new(),
        }
    }

    /// A TEXT item.
    pub fn text(concept_name: CodedConcept, value: impl Into<String>) -> Self {
        Self {
            relationship_type: Some("HAS OBS CONTEXT".into()),
            concept_name: Some(concept_name),
            text_value: Some(value.into()),
            ..Self::new(ValueType::Text)
        }
    }

    /// A UIDREF item.
    pub fn uid_ref(concept_name: CodedConcept, uid: impl Into<String>) -> Self {
        Self {
            relationship_type: Some("HAS OBS CONTEXT".into()),
            concept_name: Some(concept_name),
            uid: Some(uid.into()),
            ..Self::new(ValueType::Uidref)
        }
    }

    /// A CODE item.
    pub fn code(concept_name: CodedConcept, value: CodedConcept) -> Self {
        Self {
            relationship_type: Some("CONTAINS".into()),
            concept_name: Some(concept_name),
            concept_code: Some(value),
            ..Self::new(ValueType::Code)
        }
    }

    /// A SCOORD item drawn on `referenced` image.
    pub fn scoord(graphic_type: GraphicType, graphic_data: Vec<f64>, referenced: ReferencedSop) -> Self {
        let image = Self {
            relationship_type: Some("SELECTED FROM".into()),
            referenced_sop: Some(referenced),
            ..Self::new(ValueType::Image)
        };
        Self {
            relationship_type: Some("CONTAINS".into()),
            graphic_type: Some(graphic_type),
            graphic_data: Some(graphic_data),
            content_sequence: vec![image],
            ..Self::new(ValueType::Scoord)
        }
    }

    /// A SCOORD3D item in the given frame of reference.
    pub fn scoord3d(
        graphic_type: GraphicType,
        graphic_data: Vec<f64>,
        frame_of_reference_uid: impl Into<String>,
    ) -> Self {
        Self {
            relationship_type: Some("CONTAINS".into()),
            graphic_type: Some(graphic_type),
            graphic_data: Some(graphic_data),
            referenced_frame_of_reference_uid: Some(frame_of_reference_uid.into()),
            ..Self::new(ValueType::Scoord3d)
        }
    }

    /// Whether the concept name has the given code.
    pub fn has_concept(&self, code_value: &str, coding_scheme_designator: &str) -> bool {
        self.concept_name
            .as_ref()
            .is_some_and(|c| c.matches(code_value, coding_scheme_designator))
    }

    /// Whether this is a SCOORD or SCOORD3D item.
    pub fn is_spatial(&self) -> bool {
        matches!(self.value_type, ValueType::Scoord | ValueType::Scoord3d)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

pub(crate) fn sequence<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(OneOrMany::deserialize(deserializer)?.into_vec())
}

fn first_of_sequence<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<OneOrMany<T>> = Option::deserialize(deserializer)?;
    Ok(items.and_then(|items| items.into_vec().into_iter().next()))
}
