use crate::api::middleware::ApiResult;
use crate::models::{SearchListResponse, VideoListResponse};

/// Thin typed client over the YouTube Data API. The API key (when
/// configured) rides along on every call; a Bearer token is attached
/// only when the caller has a session.
#[derive(Clone)]
pub struct VideoService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl VideoService {
    pub fn new(http: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    pub async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
        access_token: Option<&str>,
    ) -> ApiResult<SearchListResponse> {
        let mut request = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("part", "snippet"),
                ("type", "video"),
                ("order", "relevance"),
            ])
            .query(&[("maxResults", max_results)]);

        request = self.common_params(request, page_token, access_token);

        Ok(request
            .send()
            .await?
            .error_for_status()?
            .json::<SearchListResponse>()
            .await?)
    }

    pub async fn most_popular(
        &self,
        max_results: u32,
        region_code: &str,
        page_token: Option<&str>,
        access_token: Option<&str>,
    ) -> ApiResult<VideoListResponse> {
        self.chart_request(None, max_results, region_code, page_token, access_token)
            .await
    }

    pub async fn videos_by_category(
        &self,
        category_id: &str,
        max_results: u32,
        region_code: &str,
        page_token: Option<&str>,
        access_token: Option<&str>,
    ) -> ApiResult<VideoListResponse> {
        self.chart_request(
            Some(category_id),
            max_results,
            region_code,
            page_token,
            access_token,
        )
        .await
    }

    async fn chart_request(
        &self,
        category_id: Option<&str>,
        max_results: u32,
        region_code: &str,
        page_token: Option<&str>,
        access_token: Option<&str>,
    ) -> ApiResult<VideoListResponse> {
        let mut request = self
            .http
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("chart", "mostPopular"),
                ("regionCode", region_code),
            ])
            .query(&[("maxResults", max_results)]);

        if let Some(category_id) = category_id {
            request = request.query(&[("videoCategoryId", category_id)]);
        }

        request = self.common_params(request, page_token, access_token);

        Ok(request
            .send()
            .await?
            .error_for_status()?
            .json::<VideoListResponse>()
            .await?)
    }

    fn common_params(
        &self,
        mut request: reqwest::RequestBuilder,
        page_token: Option<&str>,
        access_token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        request
    }
}
