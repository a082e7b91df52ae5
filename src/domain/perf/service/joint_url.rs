use urlencoding::encode;

use crate::domain::perf::model::{Meta, Series};

/// Perfherder's graph view expects `[repo, signature id, visible flag, framework]`.
const SERIES_VISIBLE: u8 = 1;

/// Link to the Perfherder graph view showing every source behind `series`.
///
/// Each source becomes one repeated `series=repo,id,1,framework` parameter.
/// The individual fields are percent-encoded, the separating commas are not.
pub fn build_joint_url(base_url: &str, timerange: i64, series: &[Series]) -> String {
    let mut params = vec![format!("timerange={}", timerange)];
    params.extend(
        series
            .iter()
            .flat_map(|s| s.sources.iter())
            .map(|source| format!("series={}", series_param(&source.meta))),
    );

    format!(
        "{}/perf.html#/graphs?{}",
        base_url.trim_end_matches('/'),
        params.join("&")
    )
}

fn series_param(meta: &Meta) -> String {
    format!(
        "{},{},{},{}",
        encode(&meta.repo),
        meta.id,
        SERIES_VISIBLE,
        meta.framework
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::perf::model::{SeriesConfig, Source};

    fn source(repo: &str, id: u64) -> Source {
        Source {
            meta: Meta {
                repo: repo.into(),
                id,
                framework: 10,
                lower_is_better: true,
                signature_hash: None,
                platform: None,
                suite: None,
                test: None,
            },
            data: vec![],
        }
    }

    fn series(sources: Vec<Source>) -> Series {
        Series {
            label: "x".into(),
            series_config: SeriesConfig {
                repo: "mozilla-central".into(),
                framework: 10,
                suite: "s".into(),
                test: None,
                platforms: vec!["linux64".into()],
                option: None,
                extra_options: vec![],
            },
            options: None,
            sources,
        }
    }

    #[test]
    fn lists_every_source_of_every_series() {
        let url = build_joint_url(
            "https://treeherder.mozilla.org/",
            1_209_600,
            &[
                series(vec![source("mozilla-central", 11), source("mozilla-central", 12)]),
                series(vec![source("autoland", 21)]),
            ],
        );

        assert_eq!(
            url,
            "https://treeherder.mozilla.org/perf.html#/graphs?timerange=1209600\
             &series=mozilla-central,11,1,10\
             &series=mozilla-central,12,1,10\
             &series=autoland,21,1,10"
        );
    }

    #[test]
    fn repo_names_are_encoded() {
        let url = build_joint_url("https://th", 86_400, &[series(vec![source("try repo", 1)])]);
        assert!(url.ends_with("series=try%20repo,1,1,10"));
    }

    #[test]
    fn no_sources_still_carries_timerange() {
        let url = build_joint_url("https://th", 86_400, &[series(vec![])]);
        assert_eq!(url, "https://th/perf.html#/graphs?timerange=86400");
    }
}
