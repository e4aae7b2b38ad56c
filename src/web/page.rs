//! The single-page web UI, embedded in the binary.
//!
//! The page drives one analysis at a time through four states: idle,
//! running, done, and error. All rendering happens client-side against the
//! JSON API; the server never templates anything into this document.

/// Index page markup.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Podcast to Startup Insights</title>
    <style>
        :root { color-scheme: light; }
        * { box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            background: #f7f7f9;
            color: #1a1a2e;
            margin: 0;
            padding: 2rem 1rem;
        }
        main { max-width: 680px; margin: 0 auto; }
        h1 { font-size: 1.9rem; margin-bottom: 1.5rem; }
        h3 { margin: 1.5rem 0 0.5rem; }
        label { display: block; margin-bottom: 0.4rem; font-weight: 500; }
        input[type="url"] {
            width: 100%;
            padding: 0.6rem 0.75rem;
            font-size: 1rem;
            border: 1px solid #ccc;
            border-radius: 6px;
        }
        button {
            margin-top: 0.75rem;
            padding: 0.6rem 1.25rem;
            font-size: 1rem;
            border: none;
            border-radius: 6px;
            background: #ff4b4b;
            color: white;
            cursor: pointer;
        }
        button:hover:enabled { background: #e04343; }
        button:disabled { background: #f0a0a0; cursor: wait; }
        .banner {
            margin-top: 1.25rem;
            padding: 0.75rem 1rem;
            border-radius: 6px;
            display: none;
        }
        .banner.info { background: #e7f0fe; color: #174ea6; }
        .banner.success { background: #e6f4ea; color: #137333; }
        .banner.error { background: #fce8e6; color: #a50e0e; }
        .output {
            background: white;
            border: 1px solid #e0e0e6;
            border-radius: 6px;
            padding: 1rem;
            white-space: pre-wrap;
            line-height: 1.5;
        }
        #results { display: none; }
    </style>
</head>
<body>
    <main>
        <h1>🎧 Podcast to Startup Insights</h1>

        <label for="url">Enter the YouTube URL of the podcast episode:</label>
        <input type="url" id="url" placeholder="https://www.youtube.com/watch?v=...">
        <button id="analyze">Analyze Podcast</button>

        <div id="status" class="banner"></div>

        <div id="results">
            <h3>Extracted Insights</h3>
            <div id="insights" class="output"></div>

            <h3>Recommended Resources</h3>
            <div id="recommendations" class="output"></div>
        </div>
    </main>

    <script>
        const urlInput = document.getElementById('url');
        const button = document.getElementById('analyze');
        const status = document.getElementById('status');
        const results = document.getElementById('results');

        function setStatus(kind, message) {
            status.className = 'banner ' + kind;
            status.textContent = message;
            status.style.display = 'block';
        }

        function setRunning(running) {
            button.disabled = running;
            urlInput.disabled = running;
        }

        async function analyze() {
            const url = urlInput.value.trim();
            if (!url) return;

            setRunning(true);
            results.style.display = 'none';
            setStatus('info', 'Downloading and transcribing podcast... ⏳');

            try {
                const response = await fetch('/analyze', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ url })
                });
                const data = await response.json();

                if (!response.ok || !data.success) {
                    throw new Error(data.error || 'Request failed (' + response.status + ')');
                }

                setStatus('success', '✅ Analysis complete!');
                document.getElementById('insights').textContent = data.insights;
                document.getElementById('recommendations').textContent = data.recommendations;
                results.style.display = 'block';
            } catch (err) {
                setStatus('error', '❌ An error occurred: ' + err.message);
            } finally {
                setRunning(false);
            }
        }

        button.addEventListener('click', analyze);
        urlInput.addEventListener('keydown', (e) => {
            if (e.key === 'Enter') analyze();
        });
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_carries_the_ui_strings() {
        assert!(INDEX_HTML.contains("🎧 Podcast to Startup Insights"));
        assert!(INDEX_HTML.contains("Enter the YouTube URL of the podcast episode:"));
        assert!(INDEX_HTML.contains("Analyze Podcast"));
        assert!(INDEX_HTML.contains("Downloading and transcribing podcast... ⏳"));
        assert!(INDEX_HTML.contains("✅ Analysis complete!"));
        assert!(INDEX_HTML.contains("Extracted Insights"));
        assert!(INDEX_HTML.contains("Recommended Resources"));
        assert!(INDEX_HTML.contains("❌ An error occurred: "));
    }

    #[test]
    fn test_page_posts_to_analyze() {
        assert!(INDEX_HTML.contains("fetch('/analyze'"));
    }
}
