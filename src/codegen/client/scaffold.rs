//! Fixed portions of the generated client: backend protocols, error
//! classes, the shared request helpers, and the `request()` runtime that
//! walks `RESPONSE_DISPATCH`.
//!
//! Everything here is emitted verbatim; the annotations rely on
//! `from __future__ import annotations`, so union syntax inside them is
//! safe on every supported interpreter. Runtime-evaluated aliases are
//! emitted by the caller under the profile instead.

fn text_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

pub(crate) fn backend_protocols() -> Vec<String> {
    text_lines(
        r#"class Response(Protocol):
    status_code: int

    def iter_bytes(self, chunk_size: int | None = None) -> Iterator[bytes]:
        ...

    def aiter_bytes(self, chunk_size: int | None = None) -> AsyncIterator[bytes]:
        ...

class SyncResponse(Response, Protocol):
    ...

class AsyncResponse(Response, Protocol):
    ...

class SyncBackend(Protocol):
    def request(
        self,
        method: str,
        url: RequestUrl,
        *,
        content: RequestContent | None = None,
        headers: RequestHeaders = None,
        timeout: TimeoutType = None,
    ) -> SyncResponse:
        ...

class AsyncBackend(Protocol):
    async def request(
        self,
        method: str,
        url: RequestUrl,
        *,
        content: RequestContent | None = None,
        headers: RequestHeaders = None,
        timeout: TimeoutType = None,
    ) -> AsyncResponse:
        ...
"#,
    )
}

pub(crate) fn client_errors() -> Vec<String> {
    text_lines(
        r#"class ClientError(Exception):
    pass

class TransportError(ClientError):
    pass

class DecodeError(ClientError):
    pass

class UnexpectedStatusError(ClientError):
    def __init__(self, status: int) -> None:
        super().__init__(f"unexpected response status: {status}")
        self.status = status
"#,
    )
}

/// Module-level helpers used by both client classes.
pub(crate) fn dispatch_helpers() -> Vec<String> {
    text_lines(
        r#"def _match_status(rule_status: str, status: int) -> bool:
    if rule_status == "default":
        return True
    if rule_status.endswith("XX"):
        return status // 100 == int(rule_status[0])
    return rule_status.isdigit() and status == int(rule_status)

def _select_rule(
    rules: "list[tuple[str, str | None, str]]", status: int, accept: object = None
) -> "tuple[str, str | None, str] | None":
    matched = [rule for rule in rules if _match_status(rule[0], status)]
    if not matched:
        return None
    best = matched[0]
    if accept is not None:
        for rule in matched:
            if rule[0] == best[0] and rule[1] == accept:
                return rule
    return best

def _make_response(status: int, headers: Mapping[str, str], body: object) -> object:
    cls = SuccessResponse if 200 <= status < 300 else ErrorResponse
    result = cls()
    result.status = status
    result.headers = headers
    result.body = body
    return result

def _decode_body(kind: str, raw: bytes) -> object:
    try:
        if kind == "json":
            return json.loads(raw.decode("utf-8")) if raw else None
        if kind == "text":
            return raw.decode("utf-8")
        if kind in ("bytes", "raw"):
            return raw
        if kind == "stream":
            return iter(raw.decode("utf-8").splitlines())
        if kind == "ndjson":
            return iter([json.loads(line) for line in raw.decode("utf-8").splitlines() if line])
    except (ValueError, UnicodeDecodeError) as exc:
        raise DecodeError(str(exc)) from exc
    return None

async def _agen(items: "list[object]") -> "AsyncIterator[object]":
    for item in items:
        yield item

def _prepare_request(
    base_url: str,
    default_headers: Mapping[str, str],
    method: str,
    url: str,
    params: object,
    body: object,
    content_type: object,
) -> "tuple[str, dict[str, str], RequestContent | None]":
    opts = cast("Mapping[str, Mapping[str, JsonValue]]", params or {})
    path = url
    for name, value in (opts.get("path") or {}).items():
        path = path.replace("{" + str(name) + "}", str(value))
    target = base_url.rstrip("/") + path
    query = {k: v for k, v in (opts.get("query") or {}).items() if v is not None}
    if query:
        target = target + "?" + urlencode(query)
    headers: dict[str, str] = dict(default_headers)
    for name, value in (opts.get("header") or {}).items():
        headers[str(name)] = str(value)
    cookies = opts.get("cookie") or {}
    if cookies:
        headers["Cookie"] = "; ".join(f"{k}={v}" for k, v in cookies.items())
    content: "RequestContent | None" = None
    if body is not None:
        declared = REQUEST_CONTENT_TYPES.get((method, url)) or ["application/json"]
        request_type = str(content_type) if content_type else declared[0]
        headers.setdefault("Content-Type", request_type)
        if isinstance(body, (str, bytes)):
            content = body
        elif request_type.startswith("application/x-www-form-urlencoded"):
            content = urlencode(cast("Mapping[str, str]", body))
        else:
            content = json.dumps(body)
    accept = ACCEPT_TYPES.get((method, url))
    if accept:
        headers.setdefault("Accept", ", ".join(accept))
    return target, headers, content
"#,
    )
}

pub(crate) fn client_init(sync: bool) -> Vec<String> {
    let backend = if sync { "SyncBackend" } else { "AsyncBackend" };
    text_lines(&format!(
        r#"    def __init__(
        self,
        base_url: str,
        backend: {backend},
        headers: RequestHeaders = None,
        raise_on_unexpected_status: bool = True,
    ) -> None:
        self.base_url = base_url
        self.backend = backend
        self.headers: dict[str, str] = dict(headers or {{}})
        self.raise_on_unexpected_status = raise_on_unexpected_status
"#,
    ))
}

pub(crate) fn request_impl(sync: bool) -> Vec<String> {
    if sync {
        return text_lines(
            r#"    def request(
        self,
        method: str,
        url: str,
        *,
        params: object = None,
        body: object = None,
        content_type: object = None,
        expected_statuses: object = None,
        timeout: TimeoutType = None,
    ) -> object:
        target, headers, content = _prepare_request(
            self.base_url, self.headers, method, url, params, body, content_type
        )
        response = self.backend.request(
            method, target, content=content, headers=headers, timeout=timeout
        )
        status = response.status_code
        expected = cast(
            "set[str] | None",
            expected_statuses
            if expected_statuses is not None
            else EXPECTED_STATUSES.get((method, url)),
        )
        if expected is not None and str(status) not in expected and self.raise_on_unexpected_status:
            raise UnexpectedStatusError(status)
        raw = b"".join(response.iter_bytes())
        opts = cast("Mapping[str, Mapping[str, object]]", params or {})
        accept = (opts.get("header") or {}).get("accept")
        rule = _select_rule(RESPONSE_DISPATCH.get((method, url), []), status, accept)
        kind = rule[2] if rule is not None else "raw"
        return _make_response(status, {}, _decode_body(kind, raw))
"#,
        );
    }
    text_lines(
        r#"    async def request(
        self,
        method: str,
        url: str,
        *,
        params: object = None,
        body: object = None,
        content_type: object = None,
        expected_statuses: object = None,
        timeout: TimeoutType = None,
    ) -> object:
        target, headers, content = _prepare_request(
            self.base_url, self.headers, method, url, params, body, content_type
        )
        response = await self.backend.request(
            method, target, content=content, headers=headers, timeout=timeout
        )
        status = response.status_code
        expected = cast(
            "set[str] | None",
            expected_statuses
            if expected_statuses is not None
            else EXPECTED_STATUSES.get((method, url)),
        )
        if expected is not None and str(status) not in expected and self.raise_on_unexpected_status:
            raise UnexpectedStatusError(status)
        raw = b"".join([chunk async for chunk in response.aiter_bytes()])
        opts = cast("Mapping[str, Mapping[str, object]]", params or {})
        accept = (opts.get("header") or {}).get("accept")
        rule = _select_rule(RESPONSE_DISPATCH.get((method, url), []), status, accept)
        kind = rule[2] if rule is not None else "raw"
        decoded: object
        if kind == "stream":
            decoded = _agen(list(raw.decode("utf-8").splitlines()))
        elif kind == "ndjson":
            decoded = _agen([json.loads(line) for line in raw.decode("utf-8").splitlines() if line])
        else:
            decoded = _decode_body(kind, raw)
        return _make_response(status, {}, decoded)
"#,
    )
}
