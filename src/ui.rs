use crate::models::{DashboardResponse, Theme};

pub fn render_index(dashboard: &DashboardResponse, theme: Theme) -> String {
    let theme = match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    INDEX_HTML
        .replace("{{THEME}}", theme)
        .replace("{{DATE}}", &dashboard.date)
        .replace("{{TOTAL}}", &dashboard.total_time_today)
        .replace("{{CURRENT}}", &dashboard.current_time)
        .replace("{{STREAK}}", &dashboard.streak.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" data-theme="{{THEME}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>DreamFlow</title>
  <style>
    :root {
      --bg: #f3f1fb;
      --ink: #2b2a38;
      --muted: #7b7891;
      --card: rgba(255, 255, 255, 0.9);
      --accent: #8338ec;
      --accent-2: #3a86ff;
      --shadow: 0 20px 50px rgba(58, 52, 110, 0.16);
    }

    [data-theme="dark"] {
      --bg: #171624;
      --ink: #ecebf7;
      --muted: #a3a0bd;
      --card: rgba(36, 34, 56, 0.92);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #e4ecfd 70%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 16px;
    }

    [data-theme="dark"] body {
      background: var(--bg);
    }

    .app {
      width: min(900px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: 2.2rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 14px;
    }

    .stat {
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(58, 52, 110, 0.1);
      display: grid;
      gap: 6px;
    }

    .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .value {
      font-size: 1.6rem;
      font-weight: 600;
      font-variant-numeric: tabular-nums;
    }

    form.create {
      display: flex;
      gap: 10px;
      flex-wrap: wrap;
    }

    input[type="text"] {
      flex: 1;
      min-width: 180px;
      padding: 12px 16px;
      border-radius: 999px;
      border: 1px solid rgba(58, 52, 110, 0.2);
      font-size: 1rem;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: transparent;
      color: var(--ink);
      border: 1px solid rgba(58, 52, 110, 0.2);
    }

    ul.projects {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    ul.projects li {
      display: flex;
      align-items: center;
      gap: 12px;
      padding: 12px 16px;
      border-radius: 16px;
      border: 1px solid rgba(58, 52, 110, 0.1);
    }

    ul.projects li.active {
      border-color: var(--accent);
    }

    .swatch {
      width: 14px;
      height: 14px;
      border-radius: 50%;
    }

    .name {
      flex: 1;
      font-weight: 600;
    }

    .times {
      color: var(--muted);
      font-variant-numeric: tabular-nums;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>DreamFlow</h1>
      <p class="label">{{DATE}}</p>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">Current session</span>
        <span id="current" class="value">{{CURRENT}}</span>
      </div>
      <div class="stat">
        <span class="label">Today</span>
        <span id="total" class="value">{{TOTAL}}</span>
      </div>
      <div class="stat">
        <span class="label">Streak</span>
        <span id="streak" class="value">{{STREAK}}</span>
      </div>
    </section>

    <form class="create" id="create-form">
      <input type="text" id="project-name" placeholder="New project name" />
      <button type="submit">Create project</button>
    </form>

    <ul class="projects" id="projects"></ul>

    <div class="status" id="status"></div>
  </main>

  <script>
    const projectsEl = document.getElementById('projects');
    const currentEl = document.getElementById('current');
    const totalEl = document.getElementById('total');
    const streakEl = document.getElementById('streak');
    const statusEl = document.getElementById('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const post = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body || {})
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const render = (data) => {
      currentEl.textContent = data.current_time;
      totalEl.textContent = data.total_time_today;
      streakEl.textContent = data.streak;
      projectsEl.innerHTML = '';
      data.projects.forEach((project) => {
        const li = document.createElement('li');
        li.className = project.active ? 'active' : '';
        li.innerHTML = `
          <span class="swatch" style="background:${project.color}"></span>
          <span class="name"></span>
          <span class="times">${project.today_time} / ${project.total_time}</span>
          <button data-action="toggle">${project.active ? 'Stop' : 'Start'}</button>
          <button class="secondary" data-action="complete">Done</button>
          <button class="secondary" data-action="delete">Delete</button>
        `;
        li.querySelector('.name').textContent = project.name;
        li.querySelectorAll('button').forEach((button) => {
          button.addEventListener('click', () => act(project, button.dataset.action));
        });
        projectsEl.appendChild(li);
      });
    };

    const act = async (project, action) => {
      try {
        if (action === 'delete') {
          await post(`/api/projects/${project.id}/delete`);
          if (!confirm(`Delete ${project.name}? This cannot be undone.`)) {
            await post('/api/projects/delete/cancel');
            return;
          }
          const result = await post('/api/projects/delete/confirm');
          setStatus(result.message, 'ok');
          render(result.dashboard);
          return;
        }
        const result = await post(`/api/projects/${project.id}/${action}`);
        setStatus(result.message, 'ok');
        render(result.dashboard);
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    const refresh = async () => {
      const res = await fetch('/api/dashboard');
      if (res.ok) {
        render(await res.json());
      }
    };

    const tick = async () => {
      const res = await fetch('/api/timer');
      if (res.ok) {
        currentEl.textContent = (await res.json()).elapsed;
      }
    };

    document.getElementById('create-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const input = document.getElementById('project-name');
      try {
        const result = await post('/api/projects', { name: input.value });
        input.value = '';
        setStatus(result.message, 'ok');
        render(result.dashboard);
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
    setInterval(() => tick().catch(() => {}), 1000);
  </script>
</body>
</html>
"#;
