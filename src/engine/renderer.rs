use nalgebra::Matrix4;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext, WebGlShader, WebGlUniformLocation};
use crate::engine::mesh::{Mesh, VERTEX_STRIDE};
use crate::error::{GameError, Result};

const VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute vec3 aColor;
    uniform mat4 uModelViewProjection;
    varying vec3 vColor;
    varying vec3 vPos;
    void main() {
        gl_Position = uModelViewProjection * vec4(aPosition, 1.0);
        vPos = aPosition;
        vColor = aColor;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying vec3 vColor;
    varying vec3 vPos;
    uniform vec3 uUniformColor;
    uniform bool uUseUniformColor;

    void main() {
        vec3 color = vColor;
        if (uUseUniformColor) {
            color = uUniformColor * vColor;
        }

        // Darker towards the bottom of each model
        float ao = smoothstep(-0.5, 0.5, vPos.y + 0.5);
        color *= mix(0.75, 1.0, ao);

        gl_FragColor = vec4(color, 1.0);
    }
"#;

/// Vertex and index buffers already uploaded to the GPU.
pub struct GpuMesh {
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    index_count: i32,
}

pub struct Renderer {
    gl: WebGlRenderingContext,
    program: WebGlProgram,
    mvp_location: WebGlUniformLocation,
    color_location: WebGlUniformLocation,
    use_color_location: WebGlUniformLocation,
    unit_box: GpuMesh,
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> Result<Self> {
        let program = create_program(&gl)?;
        gl.use_program(Some(&program));

        let uniform = |name: &'static str| {
            gl.get_uniform_location(&program, name)
                .ok_or_else(|| GameError::Graphics(format!("missing uniform {}", name)))
        };
        let mvp_location = uniform("uModelViewProjection")?;
        let color_location = uniform("uUniformColor")?;
        let use_color_location = uniform("uUseUniformColor")?;

        let unit_box = upload(&gl, &Mesh::unit_box())?;
        gl.enable(WebGlRenderingContext::DEPTH_TEST);

        Ok(Renderer { gl, program, mvp_location, color_location, use_color_location, unit_box })
    }

    pub fn upload(&self, mesh: &Mesh) -> Result<GpuMesh> {
        upload(&self.gl, mesh)
    }

    pub fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.gl.canvas()?.dyn_into::<HtmlCanvasElement>().ok()
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    pub fn clear(&self, [r, g, b]: [f32; 3]) {
        self.gl.clear_color(r, g, b, 1.0);
        self.gl.clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
    }

    /// Flat-colored unit box stretched by `model`.
    pub fn draw_box(&self, model: &Matrix4<f32>, view_projection: &Matrix4<f32>, color: [f32; 3]) {
        self.draw(&self.unit_box, model, view_projection, Some(color));
    }

    /// Draws with the mesh's own vertex colors.
    pub fn draw_mesh(&self, mesh: &GpuMesh, model: &Matrix4<f32>, view_projection: &Matrix4<f32>) {
        self.draw(mesh, model, view_projection, None);
    }

    fn draw(&self, mesh: &GpuMesh, model: &Matrix4<f32>, view_projection: &Matrix4<f32>, color: Option<[f32; 3]>) {
        let gl = &self.gl;
        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&mesh.vertex_buffer));
        gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&mesh.index_buffer));

        let stride = (VERTEX_STRIDE * 4) as i32;
        let pos_loc = gl.get_attrib_location(&self.program, "aPosition") as u32;
        let col_loc = gl.get_attrib_location(&self.program, "aColor") as u32;
        gl.vertex_attrib_pointer_with_i32(pos_loc, 3, WebGlRenderingContext::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(pos_loc);
        gl.vertex_attrib_pointer_with_i32(col_loc, 3, WebGlRenderingContext::FLOAT, false, stride, 12);
        gl.enable_vertex_attrib_array(col_loc);

        match color {
            Some([r, g, b]) => {
                gl.uniform1i(Some(&self.use_color_location), 1);
                gl.uniform3f(Some(&self.color_location), r, g, b);
            }
            None => gl.uniform1i(Some(&self.use_color_location), 0),
        }

        let mvp = view_projection * model;
        gl.uniform_matrix4fv_with_f32_array(Some(&self.mvp_location), false, mvp.as_slice());

        gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            mesh.index_count,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0,
        );
    }
}

fn upload(gl: &WebGlRenderingContext, mesh: &Mesh) -> Result<GpuMesh> {
    let vertex_buffer = gl.create_buffer().ok_or(GameError::Graphics("failed to create vertex buffer".into()))?;
    let index_buffer = gl.create_buffer().ok_or(GameError::Graphics("failed to create index buffer".into()))?;

    gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));
    // Safety: the views are handed straight to WebGL, which copies them before anything can allocate.
    unsafe {
        let vert_array = js_sys::Float32Array::view(&mesh.vertices);
        gl.buffer_data_with_array_buffer_view(
            WebGlRenderingContext::ARRAY_BUFFER,
            &vert_array,
            WebGlRenderingContext::STATIC_DRAW,
        );
    }

    gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
    unsafe {
        let idx_array = js_sys::Uint16Array::view(&mesh.indices);
        gl.buffer_data_with_array_buffer_view(
            WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
            &idx_array,
            WebGlRenderingContext::STATIC_DRAW,
        );
    }

    Ok(GpuMesh { vertex_buffer, index_buffer, index_count: mesh.indices.len() as i32 })
}

fn create_program(gl: &WebGlRenderingContext) -> Result<WebGlProgram> {
    let vert_shader = compile_shader(gl, WebGlRenderingContext::VERTEX_SHADER, VERTEX_SHADER)?;
    let frag_shader = compile_shader(gl, WebGlRenderingContext::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl.create_program().ok_or(GameError::Graphics("unable to create program".into()))?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl.get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS).as_bool().unwrap_or(false) {
        Ok(program)
    } else {
        Err(GameError::Graphics(gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn compile_shader(gl: &WebGlRenderingContext, shader_type: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl.create_shader(shader_type).ok_or(GameError::Graphics("unable to create shader".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        Err(GameError::Graphics(gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}
