//! Encode-then-decode tests through measurement groups.
//!
//! Encoded arguments are laid out as a measurement group the way an SR writer
//! would, then decoded again with the same mapper.

use super::{IMAGE_ID, SOP_CLASS_UID, SOP_INSTANCE_UID, TranslationMapper};
use crate::codec::tools::{
    DICOM_SR_DISPLAY, DicomSrDisplay, PLANAR_FREEHAND_CONTOUR_SEGMENTATION,
    PlanarFreehandContourSegmentationTool,
};
use crate::codec::traits::{DecodeContext, ToolCodec};
use crate::metadata::InMemoryMetadata;
use crate::model::{
    Annotation, AnnotationData, AnnotationMetadata, CodedConcept, Contour, ContourData,
    DisplayData, DisplayHandles, Point3, TextBox,
};
use crate::sr::{MeasurementGroup, ReferencedSop, SopInstanceUidToImageIdMap};

fn encode_to_group(
    codec: &dyn ToolCodec,
    annotation: &Annotation,
    mapper: &TranslationMapper,
) -> MeasurementGroup {
    let args = codec.encode(annotation, mapper).unwrap();
    args.to_measurement_group(
        codec.representation(),
        ReferencedSop::new(Some(SOP_CLASS_UID.into()), SOP_INSTANCE_UID),
    )
}

fn decode_group(
    codec: &dyn ToolCodec,
    group: &MeasurementGroup,
    mapper: &TranslationMapper,
    metadata: &InMemoryMetadata,
) -> Annotation {
    let map: SopInstanceUidToImageIdMap = [(SOP_INSTANCE_UID, IMAGE_ID)].into_iter().collect();
    let context = DecodeContext::new(&map, mapper, metadata);
    codec.decode(group, &context).unwrap()
}

#[test]
fn test_point_display_roundtrip() {
    let mapper = TranslationMapper { dx: -50.0, dy: 25.0 };
    let metadata = InMemoryMetadata::new().with_pixel_module(IMAGE_ID, 100, 200);
    let original = Annotation::new(
        AnnotationMetadata::new(DICOM_SR_DISPLAY).with_referenced_image(IMAGE_ID),
        AnnotationData::PointDisplay(DisplayData {
            text: "Calcification".into(),
            handles: DisplayHandles {
                points: vec![Point3::new(-38.0, 59.0, 0.0), Point3::new(0.0, 0.0, 0.0)],
                active_handle_index: 1,
                arrow_first: true,
                text_box: TextBox { has_moved: true },
            },
            frame_number: None,
        }),
    )
    .with_finding_sites(vec![CodedConcept::new("76752008", "SCT", "Breast")]);

    let group = encode_to_group(&DicomSrDisplay, &original, &mapper);
    assert!(DicomSrDisplay.is_valid_tracking_identifier(group.tracking_identifier().unwrap()));

    let decoded = decode_group(&DicomSrDisplay, &group, &mapper, &metadata);
    let data = decoded.display_data().unwrap();

    assert_eq!(data.text, "Calcification");
    assert_eq!(data.handles.points[0], Point3::new(-38.0, 59.0, 0.0));
    assert_eq!(data.handles.points[1], Point3::new(-28.0, 79.0, 0.0));
    assert_eq!(decoded.finding.as_ref().unwrap().code_meaning, "Calcification");
    assert_eq!(decoded.finding_sites.as_ref().unwrap().len(), 1);
    assert_ne!(decoded.annotation_uid, original.annotation_uid);
}

#[test]
fn test_closed_contour_roundtrip() {
    let mapper = TranslationMapper { dx: 10.0, dy: -5.0 };
    let polyline = vec![
        Point3::new(10.0, -5.0, 0.0),
        Point3::new(30.5, -5.0, 0.0),
        Point3::new(30.5, 12.25, 0.0),
    ];
    let original = Annotation::new(
        AnnotationMetadata::new(PLANAR_FREEHAND_CONTOUR_SEGMENTATION)
            .with_referenced_image(IMAGE_ID),
        AnnotationData::Contour(ContourData {
            contour: Contour {
                polyline: polyline.clone(),
                closed: true,
            },
            ..Default::default()
        }),
    )
    .with_finding(CodedConcept::new("108369006", "SCT", "Tumor"));

    let tool = PlanarFreehandContourSegmentationTool::default();
    let group = encode_to_group(&tool, &original, &mapper);
    assert_eq!(group.spatial_coordinates().unwrap().graphic_data.len(), 8);

    let decoded = decode_group(&tool, &group, &mapper, &InMemoryMetadata::new());
    let data = decoded.contour_data().unwrap();

    assert!(data.contour.closed);
    assert_eq!(data.contour.polyline, polyline);
    assert_eq!(decoded.metadata.label, "Tumor");
}

#[test]
fn test_open_contour_roundtrip() {
    let mapper = TranslationMapper::identity();
    let polyline = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 2.0, 0.0),
        Point3::new(3.0, 3.0, 0.0),
    ];
    let original = Annotation::new(
        AnnotationMetadata::new(PLANAR_FREEHAND_CONTOUR_SEGMENTATION)
            .with_referenced_image(IMAGE_ID),
        AnnotationData::Contour(ContourData {
            contour: Contour {
                polyline: polyline.clone(),
                closed: false,
            },
            ..Default::default()
        }),
    );

    let tool = PlanarFreehandContourSegmentationTool::default();
    let group = encode_to_group(&tool, &original, &mapper);
    let decoded = decode_group(&tool, &group, &mapper, &InMemoryMetadata::new());
    let data = decoded.contour_data().unwrap();

    assert!(!data.contour.closed);
    assert_eq!(data.contour.polyline, polyline);
}
