use log::{debug, info};
use reqwest::{
    StatusCode, Url,
    blocking::{Client, Response},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::ApiConfig,
    domain::{
        code::{ExchangeCode, PlaylistId},
        song::Song,
    },
    http::{
        Registry,
        error::ApiError,
        schema::{
            Envelope, ExchangePlaylist, NewReview, PlaylistSongs, Recommendation,
            RegisterPlaylist, Registration, ReviewSheet,
        },
    },
};

const API_PREFIX: &[&str] = &["api", "v1"];

/// Registry reached over HTTP with a blocking client
pub struct HttpRegistry {
    client: Client,
    base_url: Url,
}

impl HttpRegistry {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, base_url })
    }

    /// builds `<base>/api/v1/<segments...>`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    fn get<T: DeserializeOwned>(&self, url: Url, query: &[(&str, &str)]) -> Result<T, ApiError> {
        debug!("GET {url} {query:?}");
        let response = self.client.get(url).query(query).send()?;
        Self::decode(response)
    }

    fn post<B: Serialize>(&self, url: Url, body: &B) -> Result<Response, ApiError> {
        debug!("POST {url}");
        let response = self.client.post(url).json(body).send()?;
        Self::check_status(response)
    }

    fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        let url = response.url().to_string();
        info!("Response: {} {}", status.as_u16(), url);

        match status {
            s if s.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound { url }),
            s => Err(ApiError::Status {
                status: s.as_u16(),
                url,
            }),
        }
    }

    /// unwraps the `{ data: ... }` envelope, rejecting anything that does not fit `T`
    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check_status(response)?;
        let url = response.url().to_string();
        let body = response.text()?;
        serde_json::from_str::<Envelope<T>>(&body)
            .map(|envelope| envelope.data)
            .map_err(|e| ApiError::Decode {
                url,
                reason: e.to_string(),
            })
    }
}

impl Registry for HttpRegistry {
    fn song_candidates(&self, generation: &str, genre: &str) -> Result<Vec<Song>, ApiError> {
        let url = self.endpoint(&["songs", "candidates"])?;
        self.get(url, &[("generation", generation), ("genre", genre)])
    }

    fn register_playlist(&self, request: &RegisterPlaylist) -> Result<Registration, ApiError> {
        let url = self.endpoint(&["playlists", "register"])?;
        let response = self.post(url, request)?;
        Self::decode(response)
    }

    fn recommendation(&self, user_code: &ExchangeCode) -> Result<Recommendation, ApiError> {
        let url = self.endpoint(&["users", "recommendations"])?;
        self.get(url, &[("userCode", user_code.as_str())])
    }

    fn post_review(&self, review: &NewReview) -> Result<(), ApiError> {
        let url = self.endpoint(&["reviews"])?;
        self.post(url, review).map(|_| ())
    }

    fn reviews(&self, code: &ExchangeCode) -> Result<ReviewSheet, ApiError> {
        let url = self.endpoint(&["reviews", code.as_str()])?;
        self.get(url, &[])
    }

    fn playlist(&self, id: &PlaylistId) -> Result<Vec<Song>, ApiError> {
        let url = self.endpoint(&["playlists", id.as_str()])?;
        let playlist: PlaylistSongs = self.get(url, &[])?;
        Ok(playlist.songs)
    }

    fn exchanges(&self, user_code: &ExchangeCode) -> Result<Vec<ExchangePlaylist>, ApiError> {
        let url = self.endpoint(&["exchanges", user_code.as_str()])?;
        // the registry sends `data: null` for a code with no exchanges yet
        let exchanges: Option<Vec<ExchangePlaylist>> = self.get(url, &[])?;
        Ok(exchanges.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rouille::{Request, Response};
    use serde_json::{Value, json};
    use std::{
        sync::{Arc, Mutex, mpsc::Sender},
        thread::JoinHandle,
    };

    struct TestServer {
        url: String,
        stop: Sender<()>,
        handle: JoinHandle<()>,
    }

    impl TestServer {
        fn start<F>(handler: F) -> Self
        where
            F: Fn(&Request) -> Response + Send + Sync + 'static,
        {
            let server = rouille::Server::new("127.0.0.1:0", handler).unwrap();
            let url = format!("http://{}", server.server_addr());
            let (handle, stop) = server.stoppable();
            Self { url, stop, handle }
        }

        fn registry(&self) -> HttpRegistry {
            HttpRegistry::new(&ApiConfig {
                base_url: format!("{}/", self.url),
                timeout_secs: 5,
            })
            .unwrap()
        }

        fn shutdown(self) {
            self.stop.send(()).unwrap();
            self.handle.join().unwrap();
        }
    }

    fn code(s: &str) -> ExchangeCode {
        ExchangeCode::parse(s).unwrap()
    }

    #[test]
    fn test_song_candidates_sends_query() -> anyhow::Result<()> {
        let server = TestServer::start(|request| {
            rouille::router!(request,
                (GET) (/api/v1/songs/candidates) => {
                    let generation = request.get_param("generation").unwrap_or_default();
                    let genre = request.get_param("genre").unwrap_or_default();
                    Response::json(&json!({"data": [
                        {"id": 1, "title": generation, "artist": genre}
                    ]}))
                },
                _ => Response::empty_404()
            )
        });

        let songs = server.registry().song_candidates("gen2", "dance")?;
        server.shutdown();

        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "gen2");
        assert_eq!(songs[0].artist, "dance");

        Ok(())
    }

    #[test]
    fn test_register_playlist_posts_body() -> anyhow::Result<()> {
        let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&received);

        let server = TestServer::start(move |request| {
            rouille::router!(request,
                (POST) (/api/v1/playlists/register) => {
                    let body: Value = rouille::input::json_input(request).unwrap();
                    *sink.lock().unwrap() = Some(body);
                    Response::json(&json!({"data": {"userCode": "X7K2P9", "playlistId": 31}}))
                },
                _ => Response::empty_404()
            )
        });

        let registration = server.registry().register_playlist(&RegisterPlaylist {
            nickname: "민지".into(),
            generation: "gen2".into(),
            favorite_genre: "DANCE".into(),
            playlist_title: "민지의 플레이리스트".into(),
            song_ids: vec![4, 8],
        })?;
        server.shutdown();

        assert_eq!(registration.user_code, code("X7K2P9"));
        assert_eq!(registration.playlist_id, PlaylistId::new("31"));

        let body = received.lock().unwrap().clone().unwrap();
        assert_eq!(body["nickname"], "민지");
        assert_eq!(body["favoriteGenre"], "DANCE");
        assert_eq!(body["songIds"], json!([4, 8]));

        Ok(())
    }

    #[test]
    fn test_recommendation_sends_user_code() -> anyhow::Result<()> {
        let server = TestServer::start(|request| {
            rouille::router!(request,
                (GET) (/api/v1/users/recommendations) => {
                    match request.get_param("userCode").as_deref() {
                        Some("MINE00") => Response::json(&json!({"data": {
                            "targetUserCode": "THEIRS",
                            "songs": [{
                                "id": 3,
                                "title": "좋은날",
                                "artist": "아이유",
                                "generation": "gen2",
                                "genre": "EMOTIONAL",
                                "youtubeUrl": "https://youtu.be/good-day"
                            }]
                        }})),
                        _ => Response::empty_404(),
                    }
                },
                _ => Response::empty_404()
            )
        });

        let recommendation = server.registry().recommendation(&code("MINE00"))?;
        server.shutdown();

        assert_eq!(recommendation.target_user_code, code("THEIRS"));
        assert_eq!(recommendation.songs.len(), 1);
        assert_eq!(recommendation.songs[0].id, Some(3));
        assert_eq!(
            recommendation.songs[0].media_link(),
            Some("https://youtu.be/good-day")
        );

        Ok(())
    }

    #[test]
    fn test_reviews_decodes_sheet() -> anyhow::Result<()> {
        let server = TestServer::start(|request| {
            rouille::router!(request,
                (GET) (/api/v1/reviews/{code: String}) => {
                    assert_eq!(code, "AB12CD");
                    Response::json(&json!({"data": {
                        "reviews": [{
                            "reviewId": 9,
                            "writerUserCode": "WRITER",
                            "targetUserCode": "AB12CD",
                            "writerNickname": "지수",
                            "writerGeneration": "gen1",
                            "writerFavoriteGenre": "HIP",
                            "content": "좋아요",
                            "createdAt": "2025-11-02T10:00:00"
                        }],
                        "generation": "gen2",
                        "favoriteGenre": "DANCE"
                    }}))
                },
                _ => Response::empty_404()
            )
        });

        let sheet = server.registry().reviews(&code("AB12CD"))?;
        server.shutdown();

        assert_eq!(sheet.generation.as_deref(), Some("gen2"));
        assert_eq!(sheet.favorite_genre.as_deref(), Some("DANCE"));
        assert_eq!(sheet.reviews.len(), 1);

        let review = &sheet.reviews[0];
        assert_eq!(review.review_id, 9);
        assert_eq!(review.writer_code.as_deref(), Some("WRITER"));
        assert_eq!(review.target_code.as_deref(), Some("AB12CD"));
        assert_eq!(review.writer_nickname.as_deref(), Some("지수"));
        assert_eq!(review.writer_favorite_genre.as_deref(), Some("HIP"));
        assert_eq!(review.content, "좋아요");

        Ok(())
    }

    #[test]
    fn test_playlist_decodes_songs() -> anyhow::Result<()> {
        let server = TestServer::start(|request| {
            rouille::router!(request,
                (GET) (/api/v1/playlists/{id: String}) => {
                    assert_eq!(id, "31");
                    Response::json(&json!({"data": {"songs": [
                        {"id": 1, "title": "Gee", "artist": "소녀시대"},
                        {"id": 2, "title": "DNA", "artist": "방탄소년단", "youtubeUrl": ""}
                    ]}}))
                },
                _ => Response::empty_404()
            )
        });

        let songs = server.registry().playlist(&PlaylistId::new("31"))?;
        server.shutdown();

        assert_eq!(
            songs,
            vec![
                Song::new("Gee", "소녀시대").with_id(1),
                Song {
                    external_media_link: Some(String::new()),
                    ..Song::new("DNA", "방탄소년단").with_id(2)
                },
            ]
        );
        assert_eq!(songs[1].media_link(), None);

        Ok(())
    }

    #[test]
    fn test_reviews_not_found() {
        let server = TestServer::start(|_| Response::empty_404());

        let result = server.registry().reviews(&code("ZZZZZZ"));
        server.shutdown();

        assert!(matches!(result, Err(ApiError::NotFound { .. })));
    }

    #[test]
    fn test_server_error_maps_to_status() {
        let server = TestServer::start(|_| Response::text("boom").with_status_code(500));

        let result = server.registry().playlist(&PlaylistId::new("3"));
        server.shutdown();

        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
    }

    #[test]
    fn test_malformed_payload_is_decode_error() {
        let server = TestServer::start(|_| Response::json(&json!({"data": {"nope": true}})));

        let result = server.registry().playlist(&PlaylistId::new("3"));
        server.shutdown();

        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }

    #[test]
    fn test_short_user_code_in_registration_is_rejected() {
        let server = TestServer::start(|_| {
            Response::json(&json!({"data": {"userCode": "ABC", "playlistId": 1}}))
        });

        let result = server.registry().register_playlist(&RegisterPlaylist {
            nickname: "a".into(),
            generation: "gen1".into(),
            favorite_genre: "VOCAL".into(),
            playlist_title: "a의 플레이리스트".into(),
            song_ids: vec![],
        });
        server.shutdown();

        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }

    #[test]
    fn test_exchanges_null_data_is_empty() -> anyhow::Result<()> {
        let server = TestServer::start(|request| {
            rouille::router!(request,
                (GET) (/api/v1/exchanges/{user_code: String}) => {
                    assert_eq!(user_code, "AB12CD");
                    Response::json(&json!({"data": null}))
                },
                _ => Response::empty_404()
            )
        });

        let exchanges = server.registry().exchanges(&code("AB12CD"))?;
        server.shutdown();

        assert!(exchanges.is_empty());

        Ok(())
    }

    #[test]
    fn test_post_review_ignores_body() -> anyhow::Result<()> {
        let server = TestServer::start(|request| {
            rouille::router!(request,
                (POST) (/api/v1/reviews) => { Response::text("ok") },
                _ => Response::empty_404()
            )
        });

        server.registry().post_review(&NewReview {
            writer_user_code: "AAAAAA".into(),
            target_user_code: "BBBBBB".into(),
            content: "잘 들었어요".into(),
        })?;
        server.shutdown();

        Ok(())
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpRegistry::new(&ApiConfig {
            base_url: "not a url".into(),
            timeout_secs: 1,
        });

        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
