use api_types::{
    CommentNew, CommentsResponse,
    drink::{DrinkNew, DrinkView, DrinksResponse},
    event::{
        Attendance, AttendanceSet, AttendeesResponse, EventDetail, EventNew, EventUpdate,
        EventView, EventsResponse,
    },
    group::{GroupNew, GroupUpdate, GroupView, GroupsResponse, MemberAdd, MembersResponse},
    stats::{Dashboard, RankMetric, RankingResponse, SortOrder},
    user::{UserLogin, UserRegister, UserView},
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{ClientError, Result};

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: String,
}

/// REST client. Protected routes are sent with HTTP Basic credentials.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    credentials: Option<Credentials>,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            credentials: None,
        })
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    pub fn logout(&mut self) {
        self.credentials = None;
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl(err.to_string()))
    }

    fn public(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.http.request(method, self.endpoint(path)?))
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ClientError::MissingCredentials)?;
        Ok(self
            .public(method, path)?
            .basic_auth(&credentials.username, Some(&credentials.password)))
    }

    async fn check(res: Response) -> Result<Response> {
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::debug!("request failed with {status}: {body}");
        Err(ClientError::from_status(status.as_u16(), body))
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let res = Self::check(request.send().await?).await?;
        Ok(res.json::<T>().await?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        request: RequestBuilder,
        body: &B,
    ) -> Result<T> {
        Self::send(request.json(body)).await
    }

    // ── users ───────────────────────────────────────────────────────────────

    pub async fn register(&self, payload: &UserRegister) -> Result<UserView> {
        Self::send_json(self.public(Method::POST, "api/users/register")?, payload).await
    }

    pub async fn login(&self, payload: &UserLogin) -> Result<UserView> {
        Self::send_json(self.public(Method::POST, "api/users/login")?, payload).await
    }

    pub async fn me(&self) -> Result<UserView> {
        Self::send(self.authed(Method::GET, "api/users/me")?).await
    }

    // ── groups ──────────────────────────────────────────────────────────────

    pub async fn groups(&self) -> Result<Vec<GroupView>> {
        let res: GroupsResponse = Self::send(self.authed(Method::GET, "api/groups")?).await?;
        Ok(res.groups)
    }

    pub async fn create_group(&self, payload: &GroupNew) -> Result<GroupView> {
        Self::send_json(self.authed(Method::POST, "api/groups")?, payload).await
    }

    pub async fn group(&self, group_id: Uuid) -> Result<GroupView> {
        Self::send(self.authed(Method::GET, &format!("api/groups/{group_id}"))?).await
    }

    pub async fn update_group(&self, group_id: Uuid, payload: &GroupUpdate) -> Result<GroupView> {
        Self::send_json(
            self.authed(Method::PUT, &format!("api/groups/{group_id}"))?,
            payload,
        )
        .await
    }

    pub async fn group_members(&self, group_id: Uuid) -> Result<MembersResponse> {
        Self::send(self.authed(Method::GET, &format!("api/groups/{group_id}/members"))?).await
    }

    pub async fn add_member(&self, group_id: Uuid, username: &str) -> Result<MembersResponse> {
        let payload = MemberAdd {
            username: username.to_string(),
        };
        Self::send_json(
            self.authed(Method::POST, &format!("api/groups/{group_id}/members"))?,
            &payload,
        )
        .await
    }

    pub async fn remove_member(&self, group_id: Uuid, username: &str) -> Result<()> {
        let request = self.authed(
            Method::DELETE,
            &format!("api/groups/{group_id}/members/{username}"),
        )?;
        Self::check(request.send().await?).await?;
        Ok(())
    }

    pub async fn dashboard(&self, group_id: Uuid) -> Result<Dashboard> {
        Self::send(self.authed(Method::GET, &format!("api/groups/{group_id}/stats"))?).await
    }

    pub async fn ranking(
        &self,
        group_id: Uuid,
        metric: RankMetric,
        order: SortOrder,
    ) -> Result<RankingResponse> {
        let request = self
            .authed(Method::GET, &format!("api/groups/{group_id}/ranking"))?
            .query(&[("metric", metric_param(metric)), ("order", order_param(order))]);
        Self::send(request).await
    }

    // ── drinks ──────────────────────────────────────────────────────────────

    pub async fn add_drink(&self, payload: &DrinkNew) -> Result<DrinkView> {
        Self::send_json(self.authed(Method::POST, "api/drinks")?, payload).await
    }

    pub async fn my_drinks(&self) -> Result<Vec<DrinkView>> {
        let res: DrinksResponse = Self::send(self.authed(Method::GET, "api/drinks/user")?).await?;
        Ok(res.drinks)
    }

    pub async fn group_drinks(&self, group_id: Uuid) -> Result<Vec<DrinkView>> {
        let res: DrinksResponse =
            Self::send(self.authed(Method::GET, &format!("api/drinks/group/{group_id}"))?).await?;
        Ok(res.drinks)
    }

    pub async fn event_drinks(&self, event_id: Uuid) -> Result<Vec<DrinkView>> {
        let res: DrinksResponse =
            Self::send(self.authed(Method::GET, &format!("api/drinks/event/{event_id}"))?).await?;
        Ok(res.drinks)
    }

    pub async fn comment_drink(&self, drink_id: Uuid, text: &str) -> Result<CommentsResponse> {
        let payload = CommentNew {
            text: text.to_string(),
        };
        Self::send_json(
            self.authed(Method::POST, &format!("api/drinks/{drink_id}/comment"))?,
            &payload,
        )
        .await
    }

    // ── events ──────────────────────────────────────────────────────────────

    pub async fn create_event(&self, payload: &EventNew) -> Result<EventView> {
        Self::send_json(self.authed(Method::POST, "api/events")?, payload).await
    }

    pub async fn group_events(&self, group_id: Uuid) -> Result<Vec<EventView>> {
        let res: EventsResponse =
            Self::send(self.authed(Method::GET, &format!("api/events/group/{group_id}"))?).await?;
        Ok(res.events)
    }

    pub async fn event(&self, event_id: Uuid) -> Result<EventDetail> {
        Self::send(self.authed(Method::GET, &format!("api/events/{event_id}"))?).await
    }

    pub async fn update_event(&self, event_id: Uuid, payload: &EventUpdate) -> Result<EventView> {
        Self::send_json(
            self.authed(Method::PUT, &format!("api/events/{event_id}"))?,
            payload,
        )
        .await
    }

    pub async fn attend(&self, event_id: Uuid, status: Attendance) -> Result<AttendeesResponse> {
        Self::send_json(
            self.authed(Method::POST, &format!("api/events/{event_id}/attend"))?,
            &AttendanceSet { status },
        )
        .await
    }

    pub async fn comment_event(&self, event_id: Uuid, text: &str) -> Result<CommentsResponse> {
        let payload = CommentNew {
            text: text.to_string(),
        };
        Self::send_json(
            self.authed(Method::POST, &format!("api/events/{event_id}/comment"))?,
            &payload,
        )
        .await
    }
}

fn metric_param(metric: RankMetric) -> &'static str {
    match metric {
        RankMetric::Points => "points",
        RankMetric::TotalDrinks => "total_drinks",
        RankMetric::TotalLiters => "total_liters",
        RankMetric::TotalPartyHours => "total_party_hours",
    }
}

fn order_param(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "asc",
        SortOrder::Desc => "desc",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_on_base_url() {
        let client = Client::new("http://127.0.0.1:3000/").unwrap();
        let url = client.endpoint("api/groups").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/api/groups");
    }

    #[test]
    fn protected_routes_need_credentials() {
        let client = Client::new("http://127.0.0.1:3000").unwrap();
        assert!(matches!(
            client.authed(Method::GET, "api/users/me"),
            Err(ClientError::MissingCredentials)
        ));

        let client = client.with_credentials("alice", "secret");
        assert!(client.authed(Method::GET, "api/users/me").is_ok());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            Client::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
