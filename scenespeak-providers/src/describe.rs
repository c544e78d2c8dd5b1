use crate::error::DescribeError;
use crate::request::{HttpRequest, MultipartBody};
use scenespeak_core::types::DescribePayload;
use url::Url;

/// Builds the multipart describe request for either endpoint.
///
/// Photo payloads go out as a single `image` part; video payloads as repeated
/// `frames` parts whose order on the wire is the capture order, with indexed
/// filenames so the receiving side can re-check ordering. The prompt always
/// rides along in the `text` field.
pub fn build_describe_request(
    endpoint: &str,
    payload: &DescribePayload,
    prompt: &str,
) -> Result<HttpRequest, DescribeError> {
    let url = Url::parse(endpoint)
        .map_err(|e| DescribeError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

    let boundary = format!("Boundary-{}", uuid::Uuid::new_v4());
    let mut body: Vec<u8> = Vec::new();

    match payload {
        DescribePayload::Still(frame) => {
            append_file(
                &mut body,
                &boundary,
                "image",
                "capture.jpg",
                &frame.mime_type,
                &frame.bytes,
            );
        }
        DescribePayload::Frames(frames) => {
            for (index, frame) in frames.iter().enumerate() {
                append_file(
                    &mut body,
                    &boundary,
                    "frames",
                    &format!("frame_{index}.jpg"),
                    &frame.mime_type,
                    &frame.bytes,
                );
            }
        }
    }

    append_field(&mut body, &boundary, "text", prompt);
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    Ok(HttpRequest {
        method: "POST".into(),
        url: url.into(),
        headers: vec![
            (
                "Content-Type".into(),
                format!("multipart/form-data; boundary={}", boundary),
            ),
            ("Accept".into(), "application/json".into()),
        ],
        body: MultipartBody {
            boundary,
            bytes: body,
        },
    })
}

fn append_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

fn append_file(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    filename: &str,
    mime_type: &str,
    bytes: &[u8],
) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenespeak_core::types::CaptureFrame;

    #[test]
    fn photo_request_has_image_and_text_fields() {
        let payload = DescribePayload::Still(CaptureFrame::jpeg(vec![1, 2, 3]));
        let req = build_describe_request(
            "https://example.com/describe-image/",
            &payload,
            "Describe this image in a single, concise sentence.",
        )
        .unwrap();

        assert_eq!(req.method, "POST");
        assert!(req.header("content-type").unwrap().starts_with("multipart/form-data"));

        let s = String::from_utf8_lossy(&req.body.bytes);
        assert!(s.contains("name=\"image\""));
        assert!(s.contains("filename=\"capture.jpg\""));
        assert!(s.contains("Content-Type: image/jpeg"));
        assert!(s.contains("name=\"text\""));
        assert!(s.contains("Describe this image in a single, concise sentence."));
        assert!(!s.contains("name=\"frames\""));
    }

    #[test]
    fn video_request_preserves_frame_order() {
        let frames = (0u8..3).map(|i| CaptureFrame::jpeg(vec![i])).collect();
        let req = build_describe_request(
            "https://example.com/describe-video/",
            &DescribePayload::Frames(frames),
            "what changed?",
        )
        .unwrap();

        let s = String::from_utf8_lossy(&req.body.bytes);
        let f0 = s.find("filename=\"frame_0.jpg\"").unwrap();
        let f1 = s.find("filename=\"frame_1.jpg\"").unwrap();
        let f2 = s.find("filename=\"frame_2.jpg\"").unwrap();
        assert!(f0 < f1 && f1 < f2);
        assert_eq!(s.matches("name=\"frames\"").count(), 3);
    }

    #[test]
    fn text_field_comes_after_the_payload() {
        let payload = DescribePayload::Still(CaptureFrame::jpeg(vec![9]));
        let req = build_describe_request("https://example.com/d/", &payload, "prompt").unwrap();
        let s = String::from_utf8_lossy(&req.body.bytes);
        assert!(s.find("name=\"image\"").unwrap() < s.find("name=\"text\"").unwrap());
        assert!(s.ends_with(&format!("--{}--\r\n", req.body.boundary)));
    }

    #[test]
    fn malformed_endpoint_is_rejected_before_any_io() {
        let payload = DescribePayload::Still(CaptureFrame::jpeg(vec![1]));
        let err = build_describe_request("not a url", &payload, "p").unwrap_err();
        assert!(matches!(err, DescribeError::InvalidEndpoint(_)));
    }
}
