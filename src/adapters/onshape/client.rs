//! Typed client for the CAD service endpoints
//!
//! Wraps a [`Transport`] with the endpoint paths, headers and JSON shapes
//! for one part studio. Non-success statuses come back as
//! [`ApiError::Status`].

use super::models::{
    ConfigurationResponse, ElementInfo, EncodingParameter, EncodingRequest, EncodingResponse,
    PartStudioMetadata, TranslationRequest, TranslationStatus,
};
use super::transport::{
    ApiRequest, Transport, BINARY_ACCEPT, JSON_ACCEPT, TRANSLATION_MEDIA_TYPE,
};
use crate::domain::{ApiError, DocumentReference, ExporterError, Result, Tessellation};
use std::sync::Arc;

/// Name used when the part studio name cannot be looked up
pub const FALLBACK_PART_STUDIO_NAME: &str = "part";

/// Client bound to a single part studio
#[derive(Clone)]
pub struct OnshapeClient {
    transport: Arc<dyn Transport>,
    reference: DocumentReference,
}

impl OnshapeClient {
    /// Creates a client for the referenced part studio
    pub fn new(transport: Arc<dyn Transport>, reference: DocumentReference) -> Self {
        Self {
            transport,
            reference,
        }
    }

    /// The part studio this client targets
    pub fn reference(&self) -> &DocumentReference {
        &self.reference
    }

    /// Reads the configuration parameters of the part studio
    pub async fn get_configuration(&self) -> Result<ConfigurationResponse> {
        let url = format!(
            "/api/v6/elements/{}/configuration",
            self.reference.element_path()
        );
        let request = ApiRequest::get(url).header("Accept", JSON_ACCEPT);

        self.transport.send(request).await?.error_for_status()?.json()
    }

    /// Encodes parameter values into an opaque configuration query
    pub async fn encode_configuration(&self, parameters: Vec<EncodingParameter>) -> Result<String> {
        let url = format!(
            "/api/v6/elements/d/{}/e/{}/configurationencodings",
            self.reference.document_id, self.reference.element_id
        );
        let request = ApiRequest::post_json(url, &EncodingRequest { parameters })?
            .header("Accept", JSON_ACCEPT)
            .header("Content-Type", JSON_ACCEPT);

        let response: EncodingResponse = self
            .transport
            .send(request)
            .await?
            .error_for_status()?
            .json()?;
        Ok(response.query_param)
    }

    /// Exports an STL mesh through the synchronous endpoint
    ///
    /// The endpoint normally answers with a redirect to the content; the
    /// redirect is followed with a second, separate request.
    pub async fn export_stl(
        &self,
        tessellation: Tessellation,
        configuration: Option<&str>,
    ) -> Result<Vec<u8>> {
        let url = format!("/api/v6/partstudios/{}/stl", self.reference.element_path());
        let mut request = ApiRequest::get(url)
            .header("Accept", BINARY_ACCEPT)
            .query("chordTolerance", tessellation.chord_tolerance)
            .query("minFacetWidth", tessellation.min_facet_width)
            .no_redirects();
        if let Some(configuration) = configuration {
            request = request.query("configuration", configuration);
        }

        let response = self.transport.send(request).await?;

        let response = if response.is_redirect() {
            let location = response
                .header("Location")
                .ok_or(ExporterError::Api(ApiError::MissingRedirectLocation(
                    response.status,
                )))?
                .to_string();
            tracing::debug!(location = %location, status = response.status, "Following STL redirect");

            self.transport
                .send(ApiRequest::get(location).header("Accept", BINARY_ACCEPT))
                .await?
        } else {
            response
        };

        Ok(response.error_for_status()?.body)
    }

    /// Starts a translation job
    pub async fn create_translation(&self, body: &TranslationRequest) -> Result<TranslationStatus> {
        let url = format!(
            "/api/v6/partstudios/{}/translations",
            self.reference.element_path()
        );
        let request = ApiRequest::post_json(url, body)?
            .header("Accept", TRANSLATION_MEDIA_TYPE)
            .header("Content-Type", TRANSLATION_MEDIA_TYPE);

        self.transport.send(request).await?.error_for_status()?.json()
    }

    /// Reads the status of a translation job
    pub async fn get_translation(&self, translation_id: &str) -> Result<TranslationStatus> {
        let request = ApiRequest::get(format!("/api/v6/translations/{translation_id}"))
            .header("Accept", TRANSLATION_MEDIA_TYPE);

        self.transport.send(request).await?.error_for_status()?.json()
    }

    /// Downloads one translation result
    pub async fn download_external_data(&self, external_data_id: &str) -> Result<Vec<u8>> {
        let request = ApiRequest::get(format!(
            "/api/v6/documents/d/{}/externaldata/{external_data_id}",
            self.reference.document_id
        ))
        .header("Accept", BINARY_ACCEPT);

        Ok(self.transport.send(request).await?.error_for_status()?.body)
    }

    /// Looks up the part studio name
    ///
    /// Tries the document element list, then the part studio metadata, then
    /// the configuration's element name. Falls back to `"part"`.
    pub async fn part_studio_name(&self) -> String {
        match self.name_from_elements().await {
            Ok(Some(name)) => return name,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Element list lookup of part studio name failed")
            }
        }

        match self.name_from_metadata().await {
            Ok(name) => return name,
            Err(e) => {
                tracing::warn!(error = %e, "Metadata lookup of part studio name failed")
            }
        }

        match self.get_configuration().await {
            Ok(ConfigurationResponse {
                element_name: Some(name),
                ..
            }) => return name,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "Configuration lookup of part studio name failed")
            }
        }

        tracing::warn!("Could not retrieve part studio name, using default");
        FALLBACK_PART_STUDIO_NAME.to_string()
    }

    async fn name_from_elements(&self) -> Result<Option<String>> {
        let url = format!(
            "/api/v6/documents/{}/elements",
            self.reference.document_path()
        );
        let request = ApiRequest::get(url).header("Accept", JSON_ACCEPT);

        let elements: Vec<ElementInfo> =
            self.transport.send(request).await?.error_for_status()?.json()?;

        Ok(elements
            .into_iter()
            .find(|element| element.id == self.reference.element_id.as_str())
            .map(|element| {
                element
                    .name
                    .unwrap_or_else(|| FALLBACK_PART_STUDIO_NAME.to_string())
            }))
    }

    async fn name_from_metadata(&self) -> Result<String> {
        let url = format!(
            "/api/v6/partstudios/{}/metadata",
            self.reference.element_path()
        );
        let request = ApiRequest::get(url).header("Accept", JSON_ACCEPT);

        let metadata: PartStudioMetadata =
            self.transport.send(request).await?.error_for_status()?.json()?;
        Ok(metadata
            .name
            .unwrap_or_else(|| FALLBACK_PART_STUDIO_NAME.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::onshape::testing::ScriptedTransport;
    use crate::adapters::onshape::transport::{ApiResponse, Method};
    use serde_json::json;

    fn reference() -> DocumentReference {
        DocumentReference::from_url("https://cad.onshape.com/documents/D/w/W/e/E").unwrap()
    }

    fn client(transport: &Arc<ScriptedTransport>) -> OnshapeClient {
        OnshapeClient::new(transport.clone(), reference())
    }

    #[tokio::test]
    async fn test_export_stl_follows_redirect() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "/stl",
            ApiResponse::new(307, "").with_header("Location", "https://blob.example/mesh"),
        );
        transport.respond("https://blob.example/mesh", ApiResponse::new(200, "solid x"));

        let tessellation = crate::domain::Resolution::Fine.tessellation().unwrap();
        let bytes = client(&transport)
            .export_stl(tessellation, Some("List_a=_b"))
            .await
            .unwrap();

        assert_eq!(bytes, b"solid x");
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].follow_redirects);
        assert_eq!(requests[0].url, "/api/v6/partstudios/d/D/w/W/e/E/stl");
        assert_eq!(requests[0].query_value("chordTolerance"), Some("0.00006"));
        assert_eq!(requests[0].query_value("minFacetWidth"), Some("0.0000254"));
        assert_eq!(requests[0].query_value("configuration"), Some("List_a=_b"));
        assert_eq!(requests[1].url, "https://blob.example/mesh");
    }

    #[tokio::test]
    async fn test_export_stl_direct_body() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/stl", ApiResponse::new(200, "mesh"));

        let tessellation = crate::domain::Resolution::Coarse.tessellation().unwrap();
        let bytes = client(&transport).export_stl(tessellation, None).await.unwrap();

        assert_eq!(bytes, b"mesh");
        assert_eq!(transport.requests()[0].query_value("configuration"), None);
    }

    #[tokio::test]
    async fn test_export_stl_second_hop_failure() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "/stl",
            ApiResponse::new(302, "").with_header("Location", "https://blob.example/mesh"),
        );
        transport.respond("https://blob.example/mesh", ApiResponse::new(403, "denied"));

        let tessellation = crate::domain::Resolution::Fine.tessellation().unwrap();
        let err = client(&transport)
            .export_stl(tessellation, None)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn test_export_stl_redirect_without_location() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/stl", ApiResponse::new(307, ""));

        let tessellation = crate::domain::Resolution::Fine.tessellation().unwrap();
        let err = client(&transport)
            .export_stl(tessellation, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExporterError::Api(ApiError::MissingRedirectLocation(307))
        ));
    }

    #[tokio::test]
    async fn test_encode_configuration() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "/configurationencodings",
            ApiResponse::json_body(&json!({"queryParam": "configuration=List_a%3D_b"})),
        );

        let encoded = client(&transport)
            .encode_configuration(vec![EncodingParameter::new(
                "List_a",
                crate::domain::ParameterValue::Text("_b".into()),
            )])
            .await
            .unwrap();

        assert_eq!(encoded, "configuration=List_a%3D_b");
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "/api/v6/elements/d/D/e/E/configurationencodings");
        assert_eq!(
            request.json,
            Some(json!({"parameters": [{"parameterId": "List_a", "parameterValue": "_b"}]}))
        );
    }

    #[tokio::test]
    async fn test_part_studio_name_from_elements() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "/elements",
            ApiResponse::json_body(&json!([
                {"id": "X", "name": "Assembly"},
                {"id": "E", "name": "Bracket Studio"}
            ])),
        );

        assert_eq!(client(&transport).part_studio_name().await, "Bracket Studio");
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_part_studio_name_falls_back_through_sources() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/elements", ApiResponse::new(500, "boom"));
        transport.respond("/metadata", ApiResponse::new(404, ""));
        transport.respond(
            "/configuration",
            ApiResponse::json_body(&json!({"elementName": "From Config"})),
        );

        assert_eq!(client(&transport).part_studio_name().await, "From Config");
    }

    #[tokio::test]
    async fn test_part_studio_name_default() {
        let transport = Arc::new(ScriptedTransport::new());

        assert_eq!(client(&transport).part_studio_name().await, "part");
        assert_eq!(transport.requests().len(), 3);
    }
}
