//! Human-readable API overview served at `/`

pub const DOCS_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Zonerama Scraper API</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; line-height: 1.5; padding: 0 1rem; }
    code { background: #f3f3f3; padding: 0 .25rem; }
  </style>
</head>
<body>
  <h1>Zonerama Scraper API</h1>

  <h2>GET /listing</h2>
  <p>Crawls a profile or album tab and returns its newest albums with their photos.
     A link to a single album page returns just that album.</p>
  <ul>
    <li><strong>link</strong> (required): profile or tab link, e.g. <code>https://eu.zonerama.com/SomeAccount/12345</code>.</li>
    <li><strong>entity_limit</strong> (optional, alias <code>album_limit</code>): number of albums to crawl, newest first. Default: <code>5</code>. <code>0</code> means no limit.</li>
    <li><strong>photo_limit</strong> (optional): photos kept per album. Default: <code>10</code>. <code>0</code> means no limit.</li>
    <li><strong>concurrency</strong> (optional): album pages fetched in parallel. Default: <code>8</code>, minimum <code>1</code>, capped at <code>100</code> and at <code>entity_limit</code> when that is set.</li>
    <li><strong>rendered</strong> (optional): <code>true|false</code>. Default: <code>true</code>. <code>no-render=true</code> or <code>no_render=true</code> disable rendering.</li>
    <li><strong>debug</strong> (optional): <code>true|false</code>. Saves fetched pages beneath <code>/debuging/</code>.</li>
  </ul>
  <p>Example: <code>/listing?link=https://eu.zonerama.com/SomeAccount/12345&amp;entity_limit=5&amp;photo_limit=50</code></p>

  <h2>GET /album</h2>
  <p>Scrapes a single album. The link must contain <code>/Album/</code>.</p>
  <ul>
    <li><strong>link</strong> (required): e.g. <code>https://eu.zonerama.com/SomeAccount/Album/13878599</code>.</li>
    <li><strong>photo_limit</strong> (optional): Default: <code>10</code>. <code>0</code> means no limit.</li>
    <li><strong>rendered</strong>, <strong>no-render</strong>, <strong>debug</strong>: as above.</li>
  </ul>
  <p>Example: <code>/album?link=https://eu.zonerama.com/SomeAccount/Album/13878599&amp;photo_limit=25</code></p>

  <h2>Response</h2>
  <pre>{
  "input_link": "...",
  "entities": [
    {
      "id": "13878599",
      "title": "...",
      "url": "...",
      "date": "20. 9. 2025",
      "photo_count": 42,
      "view_count": 1337,
      "items": [
        { "id": "...", "page_link": "...", "primary_image_link": "..." }
      ]
    }
  ]
}</pre>
  <p>Invalid links return <code>400</code> with <code>{"error": "..."}</code>.
     <code>/zonerama</code> and <code>/zonerama-album</code> remain available as aliases.</p>
</body>
</html>
"#;
