//! `multipart/form-data` body encoding.
//!
//! Parts are written in insertion order. The boundary is derived from a
//! random UUID, so it never collides with the text fields the client sends.

use uuid::Uuid;

use crate::types::Photo;

#[derive(Debug, Clone)]
enum Part {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// An in-memory multipart form.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("----petfriends-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(Part::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Add a file part. The photo's bytes move into the form.
    pub fn photo(mut self, name: &str, photo: Photo) -> Self {
        self.parts.push(Part::File {
            name: name.to_string(),
            file_name: photo.file_name,
            content_type: photo.content_type,
            bytes: photo.bytes,
        });
        self
    }

    /// Value for the request's `content-type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            match part {
                Part::Text { name, value } => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", escape(name)).as_bytes(),
                    );
                    out.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n",
                            escape(name),
                            escape(file_name),
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(bytes);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        out
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_text_and_file_parts() {
        let photo = Photo {
            file_name: "dogg.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        };
        let form = MultipartForm::with_boundary("XYZ")
            .text("name", "пёсель")
            .photo("pet_photo", photo);
        let body = form.encode();

        let mut expected = Vec::new();
        expected.extend_from_slice(
            "--XYZ\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nпёсель\r\n".as_bytes(),
        );
        expected.extend_from_slice(
            b"--XYZ\r\nContent-Disposition: form-data; name=\"pet_photo\"; filename=\"dogg.jpg\"\r\n\
              Content-Type: image/jpeg\r\n\r\n",
        );
        expected.extend_from_slice(&[0xFF, 0xD8, 0xFF]);
        expected.extend_from_slice(b"\r\n--XYZ--\r\n");
        assert_eq!(body, expected);
        assert_eq!(form.content_type(), "multipart/form-data; boundary=XYZ");
    }

    #[test]
    fn empty_values_still_produce_parts() {
        let body = MultipartForm::with_boundary("B").text("age", "").encode();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "--B\r\nContent-Disposition: form-data; name=\"age\"\r\n\r\n\r\n--B--\r\n"
        );
    }

    #[test]
    fn random_boundaries_differ() {
        assert_ne!(MultipartForm::new().boundary(), MultipartForm::new().boundary());
    }

    #[test]
    fn quotes_in_file_names_are_escaped() {
        assert_eq!(escape("a\"b.jpg"), "a\\\"b.jpg");
    }
}
