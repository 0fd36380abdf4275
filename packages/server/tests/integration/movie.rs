use crate::common::{MovieFormParts, PUBLIC_URL_BASE, TestApp, routes};

const JPEG: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg";

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn dune_end_to_end() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(routes::MOVIES, MovieFormParts::new("Dune", "2021", "Sci-Fi"))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], true);
        assert_eq!(res.message(), "Movie added successfully");
        assert!(res.body["data"].is_null());

        let id = app.movie_id_by_title("Dune").await;

        let res = app.get(&routes::movie(id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.message(), "Movie fetched successfully");
        assert_eq!(res.body["data"]["title"], "Dune");
        assert_eq!(res.body["data"]["releaseYear"], 2021);
        assert_eq!(res.body["data"]["genre"], "Sci-Fi");
        assert!(res.body["data"]["coverUrl"].is_null());
        assert!(res.body["data"]["generatedSummary"].is_null());

        let first = app.get(&routes::summary(id)).await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.message(), "Movie summary fetched.");
        let summary = first.body["data"]["summary"].as_str().unwrap().to_string();
        assert_eq!(summary, "Dune is a 2021 Sci-Fi film.");

        let second = app.get(&routes::summary(id)).await;
        assert_eq!(second.body["data"]["summary"], summary.as_str());
        assert_eq!(app.generator_calls(), 1);

        let res = app.get(&routes::movie(id)).await;
        assert_eq!(res.body["data"]["generatedSummary"], summary.as_str());

        let res = app.delete(&routes::movie(id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.message(), "Movie deleted successfully");

        app.get(&routes::movie(id))
            .await
            .assert_failure(400, "No movie found with given movieId");
    }

    #[tokio::test]
    async fn list_reports_empty_catalogue_as_not_found() {
        let app = TestApp::spawn().await;
        app.get(routes::MOVIES)
            .await
            .assert_failure(404, "No movies found");
    }

    #[tokio::test]
    async fn list_filters_by_year() {
        let app = TestApp::spawn().await;
        app.create_movie("Dune", "2021", "Sci-Fi").await;
        app.create_movie("Heat", "1995", "Crime").await;

        let res = app.get(routes::MOVIES).await;
        assert_eq!(res.message(), "Movies fetched successfully.");
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);

        let res = app.get(&routes::movies_in_year("1995")).await;
        assert_eq!(res.status, 200, "{}", res.text);
        let titles: Vec<_> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Heat"]);

        app.get(&routes::movies_in_year("1800"))
            .await
            .assert_failure(404, "No movies found");
        app.get(&routes::movies_in_year("soon"))
            .await
            .assert_failure(404, "No movies found");
        app.get(&routes::movies_in_year("1995abc"))
            .await
            .assert_failure(404, "No movies found");
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn missing_or_empty_fields_are_rejected() {
        let app = TestApp::spawn().await;

        let missing_genre = MovieFormParts {
            genre: None,
            ..MovieFormParts::new("Dune", "2021", "")
        };
        for parts in [MovieFormParts::new("", "2021", "Sci-Fi"), missing_genre] {
            app.post_form(routes::MOVIES, parts).await.assert_failure(
                400,
                "'title' or 'releaseYear' or 'genre' field cannot be empty",
            );
        }
        app.get(routes::MOVIES)
            .await
            .assert_failure(404, "No movies found");
    }

    #[tokio::test]
    async fn non_numeric_year_is_rejected() {
        let app = TestApp::spawn().await;
        app.post_form(routes::MOVIES, MovieFormParts::new("Dune", "MMXXI", "Sci-Fi"))
            .await
            .assert_failure(400, "Error converting string to int");
    }

    #[tokio::test]
    async fn duplicate_title_is_rejected_ignoring_case_and_padding() {
        let app = TestApp::spawn().await;
        app.create_movie("Inception", "2010", "Sci-Fi").await;

        app.post_form(
            routes::MOVIES,
            MovieFormParts::new("  inception ", "2010", "Sci-Fi"),
        )
        .await
        .assert_failure(400, "movie with same title already exists");
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let app = TestApp::spawn().await;

        app.get(&routes::movie(404))
            .await
            .assert_failure(400, "No movie found with given movieId");
        app.get("/api/movies/not-a-number/summary")
            .await
            .assert_failure(400, "No movie found with given movieId");
        app.delete(&routes::movie(404))
            .await
            .assert_failure(400, "No movie found with given movieId");
        assert_eq!(app.generator_calls(), 0);
    }
}

mod covers {
    use super::*;

    #[tokio::test]
    async fn cover_is_stored_and_removed_with_the_movie() {
        let app = TestApp::spawn().await;
        let parts =
            MovieFormParts::new("Dune", "2021", "Sci-Fi").with_cover("poster.jpg", JPEG.to_vec());
        let res = app.post_form(routes::MOVIES, parts).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let id = app.movie_id_by_title("Dune").await;
        let res = app.get(&routes::movie(id)).await;
        let url = res.body["data"]["coverUrl"].as_str().unwrap().to_string();
        assert!(url.starts_with(&format!("{PUBLIC_URL_BASE}/images/")), "{url}");
        assert!(url.ends_with(".jpg"), "{url}");

        let path = app.cover_path(&url);
        assert_eq!(std::fs::read(&path).unwrap(), JPEG);

        let res = app.delete(&routes::movie(id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn update_without_cover_keeps_the_old_one() {
        let app = TestApp::spawn().await;
        let parts =
            MovieFormParts::new("Dune", "2021", "Sci-Fi").with_cover("poster.jpg", JPEG.to_vec());
        app.post_form(routes::MOVIES, parts).await;
        let id = app.movie_id_by_title("Dune").await;
        let original = app.get(&routes::movie(id)).await.body["data"]["coverUrl"].clone();

        let res = app
            .put_form(
                &routes::movie(id),
                MovieFormParts::new("Dune: Part One", "2021", "Adventure"),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.message(), "Movie updated successfully");

        let movie = app.get(&routes::movie(id)).await.body["data"].clone();
        assert_eq!(movie["title"], "Dune: Part One");
        assert_eq!(movie["genre"], "Adventure");
        assert_eq!(movie["coverUrl"], original);

        let parts = MovieFormParts::new("Dune: Part One", "2021", "Adventure")
            .with_cover("poster.png", JPEG.to_vec());
        app.put_form(&routes::movie(id), parts).await;
        let replaced = app.get(&routes::movie(id)).await.body["data"]["coverUrl"].clone();
        assert_ne!(replaced, original);
        assert!(replaced.as_str().unwrap().ends_with(".png"));
    }

    #[tokio::test]
    async fn file_part_without_name_counts_as_no_cover() {
        let app = TestApp::spawn().await;
        let parts = MovieFormParts::new("Heat", "1995", "Crime").with_cover("", Vec::new());
        let res = app.post_form(routes::MOVIES, parts).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let id = app.movie_id_by_title("Heat").await;
        let res = app.get(&routes::movie(id)).await;
        assert!(res.body["data"]["coverUrl"].is_null());
    }
}

mod updates {
    use super::*;

    #[tokio::test]
    async fn update_to_another_movies_title_conflicts() {
        let app = TestApp::spawn().await;
        let heat = app.create_movie("Heat", "1995", "Crime").await;
        app.create_movie("Alien", "1979", "Horror").await;

        app.put_form(&routes::movie(heat), MovieFormParts::new("ALIEN", "1995", "Crime"))
            .await
            .assert_failure(400, "movie with same title already exists");

        let res = app
            .put_form(&routes::movie(heat), MovieFormParts::new("heat", "1995", "Thriller"))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn update_of_unknown_movie_is_not_found() {
        let app = TestApp::spawn().await;
        app.put_form(&routes::movie(7), MovieFormParts::new("Dune", "2021", "Sci-Fi"))
            .await
            .assert_failure(400, "No movie found with given movieId");
    }
}
