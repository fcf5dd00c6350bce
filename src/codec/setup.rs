//! Decode-side extraction shared by every tool.

use crate::codec::error::CodecError;
use crate::metadata::{CoordinateMapper, MetadataProvider};
use crate::model::{
    Annotation, AnnotationData, AnnotationMetadata, CodedConcept, Point2, Point3, generate_uid,
};
use crate::sr::{MeasurementGroup, SopInstanceUidToImageIdMap, SpatialCoordinates};

/// Fields every decoded annotation shares, plus the group's coordinates.
///
/// Produced by [`setup_measurement`]; a tool codec turns the coordinates into
/// its own payload and calls [`MeasurementSetup::into_annotation`].
#[derive(Debug, Clone)]
pub struct MeasurementSetup<'g> {
    /// Metadata with tool name, referenced image, frame of reference and label
    pub metadata: AnnotationMetadata,
    /// Finding of the group
    pub finding: Option<CodedConcept>,
    /// Finding sites of the group
    pub finding_sites: Vec<CodedConcept>,
    /// Referenced SOP instance, when the coordinates point at an image
    pub sop_instance_uid: Option<String>,
    /// Referenced frame, for multi-frame images
    pub frame_number: Option<u32>,
    /// The geometry payload, untouched
    pub coordinates: SpatialCoordinates<'g>,
}

impl MeasurementSetup<'_> {
    /// Referenced image id (always set by [`setup_measurement`]).
    pub fn referenced_image_id(&self) -> &str {
        self.metadata.referenced_image_id.as_deref().unwrap_or_default()
    }

    /// Label of the measurement.
    pub fn label(&self) -> &str {
        &self.metadata.label
    }

    /// World-space points of the group.
    ///
    /// SCOORD pairs go through the mapper on `image_id`; SCOORD3D triples are
    /// already in patient space and are taken as they are.
    pub fn world_points(
        &self,
        image_id: &str,
        mapper: &dyn CoordinateMapper,
    ) -> Result<Vec<Point3>, CodecError> {
        if self.coordinates.has_unpaired_value() {
            log::warn!(
                "{} GraphicData length {} is not a multiple of {}, ignoring the trailing values",
                self.metadata.tool_name,
                self.coordinates.graphic_data.len(),
                self.coordinates.dimension()
            );
        }

        if self.coordinates.is_world_space() {
            return Ok(self.coordinates.triples().collect());
        }

        self.coordinates
            .pairs()
            .map(|(x, y)| mapper.image_to_world(image_id, Point2::new(x, y)))
            .collect()
    }

    /// Finish the annotation with a tool-specific payload.
    pub fn into_annotation(self, data: AnnotationData) -> Annotation {
        Annotation {
            annotation_uid: generate_uid(),
            metadata: self.metadata,
            data,
            finding: self.finding,
            finding_sites: Some(self.finding_sites),
            invalidated: false,
        }
    }
}

/// Extract the fields common to all tools from a measurement group.
///
/// No coordinates are transformed and no geometry is synthesized here.
///
/// The referenced image is the map entry for the group's referenced SOP
/// instance. Groups without an image reference (SCOORD3D) fall back to the
/// first image of the map.
pub fn setup_measurement<'g>(
    group: &'g MeasurementGroup,
    sop_instance_uid_map: &SopInstanceUidToImageIdMap,
    metadata: &dyn MetadataProvider,
    tool_type: &str,
) -> Result<MeasurementSetup<'g>, CodecError> {
    let coordinates = group.spatial_coordinates().ok_or_else(|| {
        CodecError::malformed_group(format!("{} group has no SCOORD or SCOORD3D item", tool_type))
    })?;

    let referenced_image_id = match coordinates.referenced_sop {
        Some(sop) => sop_instance_uid_map
            .get(&sop.sop_instance_uid)
            .ok_or_else(|| CodecError::UnresolvedImageReference {
                sop_instance_uid: sop.sop_instance_uid.clone(),
            })?,
        None => sop_instance_uid_map.first_image_id().ok_or_else(|| {
            CodecError::malformed_group("group references no image and the image map is empty")
        })?,
    }
    .to_string();

    let frame_of_reference_uid = coordinates
        .frame_of_reference_uid
        .map(str::to_string)
        .or_else(|| {
            metadata
                .image_plane_module(&referenced_image_id)
                .and_then(|plane| plane.frame_of_reference_uid)
        });

    let finding = group.finding().cloned();
    let finding_sites = group.finding_sites().into_iter().cloned().collect();
    let label = finding
        .as_ref()
        .map(|f| f.code_meaning.clone())
        .unwrap_or_default();

    log::debug!(
        "Setting up {} measurement on {} (label '{}')",
        tool_type,
        referenced_image_id,
        label
    );

    Ok(MeasurementSetup {
        metadata: AnnotationMetadata {
            tool_name: tool_type.to_string(),
            referenced_image_id: Some(referenced_image_id),
            frame_of_reference_uid,
            label,
        },
        finding,
        finding_sites,
        sop_instance_uid: coordinates.referenced_sop.map(|s| s.sop_instance_uid.clone()),
        frame_number: coordinates.referenced_sop.and_then(|s| s.frame_number),
        coordinates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ImagePlaneModule, InMemoryMetadata};
    use crate::sr::{ContentItem, GraphicType, ReferencedSop};

    fn point_group(sop_instance_uid: &str) -> MeasurementGroup {
        MeasurementGroup::new("ns:Tool")
            .with_finding(CodedConcept::free_text("Lesion 1"))
            .with_finding_site(CodedConcept::new("T-28000", "SRT", "Lung"))
            .with_item(ContentItem::scoord(
                GraphicType::Point,
                vec![1.0, 2.0],
                ReferencedSop::new(None, sop_instance_uid),
            ))
    }

    #[test]
    fn test_extracts_common_fields() {
        let group = point_group("S1");
        let map: SopInstanceUidToImageIdMap = [("S1", "img1")].into_iter().collect();
        let metadata = InMemoryMetadata::new();

        let setup = setup_measurement(&group, &map, &metadata, "Tool").unwrap();

        assert_eq!(setup.metadata.tool_name, "Tool");
        assert_eq!(setup.referenced_image_id(), "img1");
        assert_eq!(setup.label(), "Lesion 1");
        assert_eq!(setup.finding_sites.len(), 1);
        assert_eq!(setup.sop_instance_uid.as_deref(), Some("S1"));
        assert_eq!(setup.coordinates.graphic_data, &[1.0, 2.0]);
    }

    #[test]
    fn test_frame_of_reference_from_plane_module() {
        let group = point_group("S1");
        let map: SopInstanceUidToImageIdMap = [("S1", "img1")].into_iter().collect();
        let metadata = InMemoryMetadata::new().with_image_plane(
            "img1",
            ImagePlaneModule {
                frame_of_reference_uid: Some("1.2.840.99".into()),
                image_position_patient: [0.0; 3],
                row_cosines: [1.0, 0.0, 0.0],
                column_cosines: [0.0, 1.0, 0.0],
                row_pixel_spacing: 1.0,
                column_pixel_spacing: 1.0,
            },
        );

        let setup = setup_measurement(&group, &map, &metadata, "Tool").unwrap();
        assert_eq!(
            setup.metadata.frame_of_reference_uid.as_deref(),
            Some("1.2.840.99")
        );
    }

    #[test]
    fn test_unresolved_sop_instance() {
        let group = point_group("S9");
        let map: SopInstanceUidToImageIdMap = [("S1", "img1")].into_iter().collect();

        let err = setup_measurement(&group, &map, &InMemoryMetadata::new(), "Tool").unwrap_err();
        assert!(matches!(err, CodecError::UnresolvedImageReference { .. }));
    }

    #[test]
    fn test_scoord3d_uses_first_image() {
        let group = MeasurementGroup::new("ns:Tool").with_item(ContentItem::scoord3d(
            GraphicType::Point,
            vec![1.0, 2.0, 3.0],
            "1.2.840.77",
        ));
        let map: SopInstanceUidToImageIdMap = [("S2", "img2"), ("S1", "img1")].into_iter().collect();

        let setup = setup_measurement(&group, &map, &InMemoryMetadata::new(), "Tool").unwrap();
        assert_eq!(setup.referenced_image_id(), "img2");
        assert_eq!(
            setup.metadata.frame_of_reference_uid.as_deref(),
            Some("1.2.840.77")
        );
        assert_eq!(setup.label(), "");
    }

    #[test]
    fn test_group_without_coordinates() {
        let group = MeasurementGroup::new("ns:Tool");
        let map: SopInstanceUidToImageIdMap = [("S1", "img1")].into_iter().collect();

        let err = setup_measurement(&group, &map, &InMemoryMetadata::new(), "Tool").unwrap_err();
        assert!(matches!(err, CodecError::MalformedGroup { .. }));
    }
}
