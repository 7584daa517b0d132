use crate::config::DownloadConfig;
use request_processors::DownloadCommandFactory;
use tokio::process::Command;

const SPOTIFY_URL_MARKER: &str = "spotify";

/// Runs `spotdl` or `yt-dlp` inside their containers through `docker exec`.
pub(crate) struct DockerDownloadTools {
    config: DownloadConfig,
}

impl DockerDownloadTools {
    pub(crate) fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    fn arguments(&self, url: &str) -> Vec<String> {
        let mut arguments = vec!["exec".to_string(), "-i".to_string()];

        if url.contains(SPOTIFY_URL_MARKER) {
            arguments.extend([self.config.spotdl_container.clone(), "spotdl".to_string()]);
        } else {
            arguments.extend([
                self.config.ytdlp_container.clone(),
                "yt-dlp".to_string(),
                "-f".to_string(),
                "bestaudio".to_string(),
                "--extract-audio".to_string(),
                "--audio-format".to_string(),
                self.config.audio_format.clone(),
                "--progress".to_string(),
                "-o".to_string(),
                self.config.output_template.clone(),
            ]);
        }

        arguments.push(url.to_string());
        arguments
    }
}

impl DownloadCommandFactory for DockerDownloadTools {
    fn command(&self, url: &str) -> Command {
        let mut command = Command::new(&self.config.docker_binary);
        command.args(self.arguments(url));
        command
    }
}
